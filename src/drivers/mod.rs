// dbbackup/src/drivers/mod.rs
pub mod connection;
pub mod postgres;

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use crate::errors::AppError;
use connection::ConnectionInfo;
use postgres::PostgresDriver;

/// A database that can be dumped to, and restored from, a single artifact file.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Writes a backup of the configured database to `out_path`.
    async fn backup(&self, out_path: &Path) -> Result<()>;

    /// Loads the backup at `in_path` into the configured database.
    async fn restore(&self, in_path: &Path) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// External programs used by drivers that shell out to vendor tools.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub dump: PathBuf,
    pub restore: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            dump: PathBuf::from("pg_dump"),
            restore: PathBuf::from("pg_restore"),
        }
    }
}

/// Builds the driver matching `info.db_type`.
pub fn create_driver(
    info: &ConnectionInfo,
    tools: &ToolPaths,
) -> crate::errors::Result<Box<dyn DatabaseDriver>> {
    match info.db_type.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(Box::new(
            PostgresDriver::new(info)?.with_programs(&tools.dump, &tools.restore),
        )),
        _ => Err(AppError::UnsupportedDatabase(info.db_type.clone())),
    }
}
