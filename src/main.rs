use learning_core::config::Config;
use learning_core::logging::init_tracing;
use learning_core::srs::{Clock, MasteryStats, SystemClock};
use learning_core::store::keys::{parse_snapshot_key, snapshot_prefix};
use learning_core::store::Store;

fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&config).expect("Failed to initialize tracing");
    tracing::info!(profile_id = %config.profile_id, "Starting learning-report");

    let store = Store::open(&config.sled_path).expect("Failed to open sled database");
    store.run_migrations().expect("Failed to run migrations");

    let today = SystemClock.today();
    let prefix = snapshot_prefix(&config.profile_id);
    let keys = store
        .list_snapshot_keys()
        .expect("Failed to list snapshot keys");

    let mut reported = 0usize;
    for key in keys.iter().filter(|key| key.starts_with(&prefix)) {
        let Some((_, domain)) = parse_snapshot_key(key) else {
            tracing::warn!(key = %key, "Skipping snapshot with unrecognised key");
            continue;
        };
        // 报表只读调度状态，条目内容按原始 JSON 处理，不区分内容域
        let snapshot = match store.load_snapshot::<serde_json::Value>(key) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to load snapshot");
                continue;
            }
        };

        let stats = MasteryStats::from_states(snapshot.items.iter().map(|t| &t.schedule), today);
        tracing::info!(
            domain = domain.as_str(),
            version = snapshot.version,
            items = stats.total(),
            due = stats.due,
            new = stats.new,
            learning = stats.learning,
            familiar = stats.familiar,
            mastered = stats.mastered,
            "Repository report"
        );
        reported += 1;
    }

    if reported == 0 {
        tracing::info!(profile_id = %config.profile_id, "No snapshots stored for profile");
    }
}

