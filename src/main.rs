//! Binary entry point that glues the SQLite-backed store to the TUI: resolve
//! paths, start logging, open the store, and drive the Ratatui event loop
//! until the user exits.
use clap::Parser;
use log::{error, info};
use workout_tracker::{logging, run_app, App, AppConfig, Cli, WorkoutStore};

/// Returning a `Result` bubbles fatal startup problems (an unwritable data
/// directory, a corrupt database) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::resolve(Cli::parse())?;
    logging::init(&config.log_path)?;
    info!(
        "starting workout-tracker (db: {}, log: {})",
        config.db_path.display(),
        config.log_path.display()
    );

    let store = WorkoutStore::open(&config.db_path).inspect_err(|err| {
        error!("could not open workout store: {err:#}");
    })?;

    let mut app = App::new(store);
    let result = run_app(&mut app);
    app.into_store().close()?;
    result
}
