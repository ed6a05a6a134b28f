//! Domain models that mirror the `workouts` table and get passed throughout
//! the TUI. They stay plain data holders so the store and the screens can
//! focus on persistence and presentation respectively.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One persisted workout. Rows are never updated in place, so every field is
/// fixed from the moment the store hands the record back.
pub struct WorkoutRecord {
    /// Primary key assigned by SQLite. The delete flow sends it back to the
    /// store, so we keep it even though the list never displays it.
    pub id: i64,
    /// What the user did ("Running", "Weights", ...).
    pub activity: String,
    /// Duration in minutes, kept exactly as typed. The form does not coerce
    /// it to a number, so "45" and "about an hour" are both valid values.
    pub duration_minutes: String,
    /// Free-form grouping such as "Cardio" or "Strength".
    pub category: String,
    /// Optional training partner. Empty when the user left the field blank.
    pub partner_name: String,
}

impl fmt::Display for WorkoutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} min)", self.activity, self.duration_minutes)
    }
}

/// Values collected from the form for a row that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWorkout {
    pub activity: String,
    pub duration_minutes: String,
    pub category: String,
    pub partner_name: String,
}

impl NewWorkout {
    /// Convenience constructor used by tests and seeding code.
    pub fn new(
        activity: impl Into<String>,
        duration_minutes: impl Into<String>,
        category: impl Into<String>,
        partner_name: impl Into<String>,
    ) -> Self {
        Self {
            activity: activity.into(),
            duration_minutes: duration_minutes.into(),
            category: category.into(),
            partner_name: partner_name.into(),
        }
    }

    /// Attach the id SQLite generated for this row.
    pub fn into_record(self, id: i64) -> WorkoutRecord {
        WorkoutRecord {
            id,
            activity: self.activity,
            duration_minutes: self.duration_minutes,
            category: self.category,
            partner_name: self.partner_name,
        }
    }
}
