//! Core library surface for the Workout Tracker TUI application.
//!
//! The binary only needs to resolve its configuration, open the store, and
//! hand it to the UI; integration tests reuse the same store directly.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::{AppConfig, Cli};
pub use db::WorkoutStore;
pub use error::ValidationError;
pub use models::{NewWorkout, WorkoutRecord};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
