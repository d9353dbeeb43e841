// dbbackup/src/storage/local.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::StorageBackend;
use crate::errors::AppError;

/// Keeps backups as plain files; targets and sources are filesystem paths.
#[derive(Debug, Default, Clone)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn store(&self, source: &Path, target: &str) -> Result<()> {
        let target_path = Path::new(target);

        if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create target directory: {}", parent.display()))?;
        }

        let mut source_file = File::open(source)
            .await
            .with_context(|| format!("Failed to open source file: {}", source.display()))?;
        let mut target_file = File::create(target_path)
            .await
            .with_context(|| format!("Failed to create target file: {}", target_path.display()))?;

        let copied = tokio::io::copy(&mut source_file, &mut target_file)
            .await
            .with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    target_path.display()
                )
            })?;
        target_file
            .flush()
            .await
            .with_context(|| format!("Failed to flush target file: {}", target_path.display()))?;

        info!(
            source = %source.display(),
            destination = %target_path.display(),
            bytes = copied,
            "Stored backup on local filesystem"
        );
        Ok(())
    }

    async fn retrieve(&self, source: &str) -> Result<PathBuf> {
        let path = PathBuf::from(source);
        if let Err(err) = fs::metadata(&path).await {
            return Err(AppError::BackupFileNotFound { path, source: err }.into());
        }
        Ok(path)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
