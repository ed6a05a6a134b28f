//! Ratatui front-end: a landing screen and the workouts screen that binds
//! the entry form and record list to the store.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
