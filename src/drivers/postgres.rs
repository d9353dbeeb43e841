// dbbackup/src/drivers/postgres.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use which::which;

use super::DatabaseDriver;
use super::connection::ConnectionInfo;
use crate::errors::AppError;

const DEFAULT_PORT: u16 = 5432;

/// PostgreSQL driver backed by the `pg_dump` and `pg_restore` client tools.
///
/// Credentials reach the tools through `PG*` variables set on the child
/// process only.
#[derive(Debug, Clone)]
pub struct PostgresDriver {
    host: String,
    port: u16,
    user: String,
    password: String,
    database: String,
    dump_program: PathBuf,
    restore_program: PathBuf,
}

impl PostgresDriver {
    pub fn new(info: &ConnectionInfo) -> crate::errors::Result<Self> {
        if info.host.is_empty() || info.user.is_empty() || info.database.is_empty() {
            return Err(AppError::IncompleteConnectionInfo);
        }

        Ok(Self {
            host: info.host.clone(),
            port: info.port.filter(|port| *port != 0).unwrap_or(DEFAULT_PORT),
            user: info.user.clone(),
            password: info.password.clone(),
            database: info.database.clone(),
            dump_program: PathBuf::from("pg_dump"),
            restore_program: PathBuf::from("pg_restore"),
        })
    }

    /// Overrides the dump/restore executables (names looked up in PATH, or paths).
    pub fn with_programs(mut self, dump: impl Into<PathBuf>, restore: impl Into<PathBuf>) -> Self {
        self.dump_program = dump.into();
        self.restore_program = restore.into();
        self
    }

    fn pg_env(&self) -> Vec<(&'static str, String)> {
        let mut env = vec![
            ("PGUSER", self.user.clone()),
            ("PGHOST", self.host.clone()),
            ("PGPORT", self.port.to_string()),
            ("PGDATABASE", self.database.clone()),
        ];
        if !self.password.is_empty() {
            env.push(("PGPASSWORD", self.password.clone()));
        }
        env
    }

    async fn run_tool(&self, program: &'static str, executable: &Path, args: Vec<OsString>) -> Result<()> {
        let resolved = find_executable(program, executable)?;
        debug!(program, path = %resolved.display(), ?args, "Running PostgreSQL client tool");

        let status = Command::new(&resolved)
            .args(&args)
            .envs(self.pg_env())
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to execute {} at {}", program, resolved.display()))?;

        if !status.success() {
            return Err(AppError::CommandFailed { program, status }.into());
        }
        Ok(())
    }
}

fn find_executable(program: &str, executable: &Path) -> Result<PathBuf> {
    which(executable).with_context(|| {
        format!(
            "{} executable not found ({}). Please ensure PostgreSQL client tools are installed and in your PATH.",
            program,
            executable.display()
        )
    })
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path);
    arg
}

#[async_trait]
impl DatabaseDriver for PostgresDriver {
    async fn backup(&self, out_path: &Path) -> Result<()> {
        if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }

        info!(
            database = %self.database,
            host = %self.host,
            port = self.port,
            output = %out_path.display(),
            "Dumping database with pg_dump"
        );

        let args = vec![
            OsString::from("--format=custom"),
            OsString::from("--no-owner"),
            OsString::from("--no-privileges"),
            flag_with_path("--file=", out_path),
        ];
        self.run_tool("pg_dump", &self.dump_program, args).await
    }

    async fn restore(&self, in_path: &Path) -> Result<()> {
        if let Err(source) = tokio::fs::metadata(in_path).await {
            return Err(AppError::BackupFileNotFound {
                path: in_path.to_path_buf(),
                source,
            }
            .into());
        }

        info!(
            database = %self.database,
            host = %self.host,
            port = self.port,
            input = %in_path.display(),
            "Restoring database with pg_restore"
        );

        let args = vec![
            OsString::from("--clean"),
            OsString::from("--if-exists"),
            OsString::from("--no-owner"),
            OsString::from("--no-privileges"),
            OsString::from(format!("--dbname={}", self.database)),
            in_path.as_os_str().to_os_string(),
        ];
        self.run_tool("pg_restore", &self.restore_program, args).await
    }

    fn name(&self) -> &'static str {
        "postgresql"
    }
}
