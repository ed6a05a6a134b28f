use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Owner of the single SQLite connection. The app opens it once at startup,
/// hands it to the UI, and closes it explicitly on the way out.
pub struct WorkoutStore {
    pub(super) conn: Connection,
    path: Option<PathBuf>,
}

impl WorkoutStore {
    /// Open (or create) the database file, switch it to WAL journaling, and
    /// make sure the `workouts` table exists. Any failure here is fatal for
    /// the caller because no screen can work without the store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.enable_wal()?;
        store.initialize_schema()?;
        info!("workout store ready at {}", path.display());
        Ok(store)
    }

    /// Same setup as [`WorkoutStore::open`] but nothing touches the disk.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let store = Self { conn, path: None };
        store.enable_wal()?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create the table when it is missing. Running it against an existing
    /// database leaves the rows alone.
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS workouts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    activity TEXT NOT NULL,
                    durationMinutes INTEGER NOT NULL,
                    category TEXT NOT NULL,
                    partnerName TEXT
                )",
                [],
            )
            .context("failed to create workouts table")?;
        debug!("workouts schema initialized");
        Ok(())
    }

    /// Journal mode SQLite reports after the WAL request. In-memory databases
    /// answer `memory` since they have no file to log next to.
    pub fn journal_mode(&self) -> Result<String> {
        self.conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .context("failed to read journal mode")
    }

    /// Location of the database file, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection, surfacing errors that `Drop` would swallow.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close SQLite database")?;
        info!("workout store closed");
        Ok(())
    }

    fn enable_wal(&self) -> Result<()> {
        let mode: String = self
            .conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .context("failed to enable WAL journaling")?;
        debug!("journal mode is {mode}");
        Ok(())
    }
}
