pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

use crate::srs::SrsError;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub snapshots: sled::Tree,
    pub meta: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid key {key}: {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
    #[error(transparent)]
    Engine(#[from] SrsError),
}

impl StoreError {
    /// 与引擎错误一致：只有数据不足类错误可由调用方恢复
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(err) => err.is_recoverable(),
            _ => false,
        }
    }
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let snapshots = db.open_tree(trees::SNAPSHOTS)?;
        let meta = db.open_tree(trees::META)?;

        tracing::info!(path = sled_path, "Store opened");
        Ok(Self {
            db,
            snapshots,
            meta,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
