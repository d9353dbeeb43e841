// dbbackup/src/storage/s3.rs
use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::StorageBackend;
use crate::errors::AppError;

pub const BUCKET_ENV: &str = "AWS_BUCKET";

/// Object-storage backend. Only the bucket is configured so far; every
/// transfer is rejected.
#[derive(Debug, Clone, Default)]
pub struct S3Storage {
    bucket: Option<String>,
}

impl S3Storage {
    pub fn from_env() -> Self {
        Self::new(env::var(BUCKET_ENV).ok().filter(|b| !b.is_empty()))
    }

    pub fn new(bucket: Option<String>) -> Self {
        Self { bucket }
    }
}

#[async_trait]
impl StorageBackend for S3Storage {
    // TODO: upload once credentials, multipart transfer and retry policy are settled.
    async fn store(&self, source: &Path, target: &str) -> Result<()> {
        warn!(bucket = ?self.bucket, source = %source.display(), key = target, "S3 upload requested");
        Err(AppError::NotImplemented("S3 storage").into())
    }

    async fn retrieve(&self, source: &str) -> Result<PathBuf> {
        warn!(bucket = ?self.bucket, key = source, "S3 download requested");
        Err(AppError::NotImplemented("S3 storage").into())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
