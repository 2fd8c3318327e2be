use crate::constants::SNAPSHOT_VERSION;
use crate::srs::RepositorySnapshot;
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_check_snapshot_versions", m002_check_snapshot_versions),
    ]
}

/// 执行所有未应用的迁移。
///
/// - 每个迁移必须幂等：迁移成功但版本号写入前崩溃时，重启会重跑一次。
/// - 版本号在每个迁移完成后立即持久化。
/// - 仅向前，set_version 拒绝降级。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.meta.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 4] = raw.as_ref().try_into().map_err(|_| StoreError::Migration {
                version: 0,
                message: format!("corrupt version marker ({} bytes)", raw.len()),
            })?;
            Ok(u32::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .meta
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// 快照格式目前只有版本 1；遇到更新的版本直接拒绝启动，避免旧程序覆盖新数据
fn m002_check_snapshot_versions(store: &Store) -> Result<(), StoreError> {
    for entry in store.snapshots.iter() {
        let (key, value) = entry?;
        let snapshot: RepositorySnapshot<serde_json::Value> = Store::deserialize(&value)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StoreError::Migration {
                version: 2,
                message: format!(
                    "snapshot {} has version {}, newer than supported {}",
                    String::from_utf8_lossy(&key),
                    snapshot.version,
                    SNAPSHOT_VERSION
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn migration_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let store = Store::open(path.to_str().unwrap()).unwrap();

        run(&store).unwrap();
        let first = get_current_version(&store).unwrap();
        run(&store).unwrap();
        let second = get_current_version(&store).unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 2);
    }

    #[test]
    fn downgrade_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db2");
        let store = Store::open(path.to_str().unwrap()).unwrap();

        set_version(&store, 3).unwrap();
        let err = set_version(&store, 2).unwrap_err();
        assert!(matches!(err, StoreError::Migration { .. }));
    }

    #[test]
    fn newer_snapshot_blocks_migration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db3");
        let store = Store::open(path.to_str().unwrap()).unwrap();

        let future = RepositorySnapshot::<serde_json::Value> {
            version: SNAPSHOT_VERSION + 1,
            items: Vec::new(),
        };
        store
            .snapshots
            .insert("default:vocabulary", Store::serialize(&future).unwrap())
            .unwrap();

        assert!(matches!(run(&store), Err(StoreError::Migration { version: 2, .. })));
        assert_eq!(get_current_version(&store).unwrap(), 1);
    }
}
