// dbbackup/src/service/mod.rs
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::Builder as TempFileBuilder;
use tracing::{info, warn};

use crate::drivers::connection::{ConnectionInfo, default_port};
use crate::drivers::{DatabaseDriver, ToolPaths, create_driver};
use crate::storage::{StorageBackend, StorageType, create_storage};

const TEMP_PREFIX: &str = "db-backup-";
const TEMP_SUFFIX: &str = ".dump";

/// Knobs for building a [`BackupService`] beyond the connection string and storage type.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub tools: ToolPaths,
    /// Directory for the temporary artifact; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Database type used when the connection string does not name one.
    pub fallback_db_type: Option<String>,
}

/// Pairs one database driver with one storage backend.
pub struct BackupService {
    driver: Box<dyn DatabaseDriver>,
    storage: Box<dyn StorageBackend>,
    scratch_dir: PathBuf,
}

impl BackupService {
    /// Parses the connection string and selects the driver and storage backend.
    ///
    /// Nothing touches the filesystem or spawns processes here, so a bad
    /// database or storage type is rejected up front.
    pub fn new(
        connection_string: &str,
        storage_type: &str,
        options: &ServiceOptions,
    ) -> crate::errors::Result<Self> {
        let mut conn = ConnectionInfo::parse(connection_string)?;
        if conn.db_type.is_empty()
            && let Some(fallback) = &options.fallback_db_type
        {
            conn.db_type = fallback.clone();
            conn.port = conn.port.or_else(|| default_port(fallback));
        }

        let driver = create_driver(&conn, &options.tools)?;
        let storage_type: StorageType = storage_type.parse()?;
        info!(
            connection = %conn,
            driver = driver.name(),
            storage = %storage_type,
            "Backup service configured"
        );

        let service = Self::from_parts(driver, create_storage(storage_type));
        Ok(match &options.scratch_dir {
            Some(dir) => service.with_scratch_dir(dir.clone()),
            None => service,
        })
    }

    pub fn from_parts(driver: Box<dyn DatabaseDriver>, storage: Box<dyn StorageBackend>) -> Self {
        Self {
            driver,
            storage,
            scratch_dir: env::temp_dir(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Dumps the database into a temporary artifact and hands it to storage under `target`.
    ///
    /// The temporary artifact is removed whether or not the backup succeeds.
    pub async fn backup(&self, target: &str) -> Result<()> {
        let artifact = TempFileBuilder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.scratch_dir)
            .with_context(|| {
                format!(
                    "failed to create temporary file in {}",
                    self.scratch_dir.display()
                )
            })?
            .into_temp_path();

        let result = self.backup_into(&artifact, target).await;

        let artifact_path = artifact.to_path_buf();
        if let Err(err) = artifact.close()
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %artifact_path.display(), error = %err, "Failed to remove temporary backup file");
        }
        result
    }

    async fn backup_into(&self, artifact: &Path, target: &str) -> Result<()> {
        self.driver
            .backup(artifact)
            .await
            .context("backup failed")?;
        self.storage
            .store(artifact, target)
            .await
            .context("storing backup failed")?;

        info!(target_location = target, storage = self.storage.name(), "Backup stored");
        Ok(())
    }

    /// Fetches the artifact stored under `target` and restores the database from it.
    pub async fn restore(&self, target: &str) -> Result<()> {
        let artifact = self
            .storage
            .retrieve(target)
            .await
            .context("retrieving backup failed")?;
        self.driver
            .restore(&artifact)
            .await
            .context("restore failed")?;

        info!(source_location = target, driver = self.driver.name(), "Restore finished");
        Ok(())
    }
}
