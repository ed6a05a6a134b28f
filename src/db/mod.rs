//! Persistence module split across logical submodules.

mod connection;
mod workouts;

pub use connection::WorkoutStore;
