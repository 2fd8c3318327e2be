pub const SNAPSHOTS: &str = "repository_snapshots";
pub const META: &str = "meta";
