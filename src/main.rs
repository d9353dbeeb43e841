//! Database Backup/Restore Tool
//!
//! Dumps a database with its vendor client tools and keeps the artifact in a
//! storage backend, or restores a database from such an artifact.

// dbbackup/src/main.rs
mod cli;
mod config;
mod drivers;
mod errors;
mod logging;
mod service;
mod storage;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::env;
use std::process::ExitCode;
use tracing::info;

use cli::Cli;
use config::{AppConfig, Operation};
use service::BackupService;

/// Main entry point for the backup/restore tool
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    logging::init();

    let cli = Cli::parse_from(cli::normalize_args(env::args_os()));
    let app_config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    if app_config.source.is_empty() || app_config.target.is_empty() {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::FAILURE;
    }

    match run_app(&app_config).await {
        Ok(()) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app(app_config: &AppConfig) -> Result<()> {
    let operation: Operation = app_config.operation.parse()?;

    let service = BackupService::new(
        &app_config.source,
        &app_config.storage,
        &app_config.service,
    )
    .context("Failed to initialize backup service")?;

    match operation {
        Operation::Backup => {
            info!(target_location = %app_config.target, "🚀 Starting backup");
            service
                .backup(&app_config.target)
                .await
                .context("Backup process failed")?;
        }
        Operation::Restore => {
            info!(source_location = %app_config.target, "🔄 Starting restore");
            service
                .restore(&app_config.target)
                .await
                .context("Restore process failed")?;
        }
    }
    Ok(())
}
