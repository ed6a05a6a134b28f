//! Command-line flags and the resolved paths the rest of the app runs with.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".workout-tracker";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "workouts.db";
/// Log file written next to the database. The TUI owns the terminal, so logs
/// cannot go to stderr.
const LOG_FILE_NAME: &str = "workout-tracker.log";

/// Terminal workout log backed by a local SQLite file
#[derive(Debug, Parser)]
#[command(name = "workout-tracker", version = env!("CARGO_PKG_VERSION"), long_about = None)]
pub struct Cli {
    /// Override the database path (defaults to ~/.workout-tracker/workouts.db)
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Override the log file path (defaults to ~/.workout-tracker/workout-tracker.log)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Paths the application needs after flags and defaults are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppConfig {
    /// Merge explicit flags with the home-directory defaults. The home lookup
    /// only happens when at least one flag is missing.
    pub fn resolve(cli: Cli) -> Result<Self> {
        let db_path = match cli.db {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_path = match cli.log_file {
            Some(path) => path,
            None => data_dir()?.join(LOG_FILE_NAME),
        };
        Ok(Self { db_path, log_path })
    }
}

/// Resolve the application data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
