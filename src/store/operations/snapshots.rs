use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::srs::{ItemRepository, RepositoryEvent, RepositorySnapshot, StudyItem};
use crate::store::{Store, StoreError};

impl Store {
    pub fn save_snapshot<T: Serialize>(
        &self,
        key: &str,
        snapshot: &RepositorySnapshot<T>,
    ) -> Result<(), StoreError> {
        self.snapshots.insert(key.as_bytes(), Self::serialize(snapshot)?)?;
        tracing::debug!(key, items = snapshot.items.len(), "Snapshot saved");
        Ok(())
    }

    pub fn load_snapshot<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<RepositorySnapshot<T>>, StoreError> {
        match self.snapshots.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 读取并恢复仓库；键不存在时返回空仓库
    pub fn load_repository<T>(&self, key: &str) -> Result<ItemRepository<T>, StoreError>
    where
        T: StudyItem + DeserializeOwned,
    {
        match self.load_snapshot(key)? {
            Some(snapshot) => Ok(ItemRepository::from_snapshot(snapshot)?),
            None => {
                tracing::info!(key, "No snapshot stored, starting with an empty repository");
                Ok(ItemRepository::new())
            }
        }
    }

    pub fn delete_snapshot(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.snapshots.remove(key.as_bytes())?.is_some())
    }

    pub fn list_snapshot_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in self.snapshots.iter().keys() {
            let key = entry?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    /// 生成变更回调：每次变更写入完整快照。写入失败只记录日志，不影响内存中的仓库。
    pub fn autosave<T>(
        self: &Arc<Self>,
        key: impl Into<String>,
    ) -> impl FnMut(&RepositoryEvent, &ItemRepository<T>) + 'static
    where
        T: StudyItem + Clone + Serialize + 'static,
    {
        let store = Arc::clone(self);
        let key = key.into();
        move |event, repository| {
            if let Err(err) = store.save_snapshot(&key, &repository.snapshot()) {
                tracing::error!(key = %key, ?event, error = %err, "Autosave failed");
            }
        }
    }
}
