//! Typed errors for the failures the UI recovers from locally. Everything
//! else (opening the database, terminal setup) travels as `anyhow::Error`.

use thiserror::Error;

/// Raised when a workout submission is missing one of its required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Lists the blank fields in form order, e.g. `["activity", "category"]`.
    #[error("Please fill in {}.", join_fields(.0))]
    MissingFields(Vec<&'static str>),
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            ValidationError::MissingFields(fields) => fields,
        }
    }
}

fn join_fields(fields: &[&'static str]) -> String {
    match fields {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
