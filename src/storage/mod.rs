// dbbackup/src/storage/mod.rs
pub mod local;
pub mod s3;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;

use crate::errors::AppError;
use local::LocalStorage;
use s3::S3Storage;

/// Moves backup artifacts between a local file and their durable location.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persists the local file `source` under `target`.
    async fn store(&self, source: &Path, target: &str) -> Result<()>;

    /// Makes the artifact stored under `source` available locally and returns its path.
    async fn retrieve(&self, source: &str) -> Result<PathBuf>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Local,
    S3,
}

impl FromStr for StorageType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(StorageType::Local),
            "s3" => Ok(StorageType::S3),
            other => Err(AppError::UnsupportedStorage(other.to_string())),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Local => f.write_str("local"),
            StorageType::S3 => f.write_str("s3"),
        }
    }
}

pub fn create_storage(storage_type: StorageType) -> Box<dyn StorageBackend> {
    match storage_type {
        StorageType::Local => Box::new(LocalStorage::new()),
        StorageType::S3 => Box::new(S3Storage::from_env()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_storage_types() -> anyhow::Result<()> {
        assert_eq!("local".parse::<StorageType>()?, StorageType::Local);
        assert_eq!("s3".parse::<StorageType>()?, StorageType::S3);
        assert_eq!(create_storage(StorageType::Local).name(), "local");
        assert_eq!(create_storage(StorageType::S3).name(), "s3");
        Ok(())
    }

    #[test]
    fn rejects_unknown_storage_types() {
        for name in ["ftp", "LOCAL", ""] {
            assert!(matches!(
                name.parse::<StorageType>(),
                Err(AppError::UnsupportedStorage(ref n)) if n == name
            ));
        }
    }
}
