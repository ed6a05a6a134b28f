use std::cmp::min;

use anyhow::{Context, Result};

use crate::db::WorkoutStore;
use crate::models::WorkoutRecord;

use super::forms::{WorkoutField, WorkoutForm};

/// Which half of the workouts screen receives key presses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Form,
    List,
}

/// State behind the workouts screen: the entry form plus the last snapshot
/// read from the store.
pub(crate) struct WorkoutScreen {
    pub(crate) form: WorkoutForm,
    pub(crate) records: Vec<WorkoutRecord>,
    pub(crate) selected: usize,
    pub(crate) focus: Focus,
}

impl WorkoutScreen {
    /// Build the screen with an empty form and the current table contents.
    pub(crate) fn load(store: &WorkoutStore) -> Result<Self> {
        let mut screen = Self {
            form: WorkoutForm::default(),
            records: Vec::new(),
            selected: 0,
            focus: Focus::Form,
        };
        screen.reload(store)?;
        Ok(screen)
    }

    /// Replace the displayed records with a fresh read. The list is never
    /// patched in place, so what is on screen always matches the table.
    pub(crate) fn reload(&mut self, store: &WorkoutStore) -> Result<()> {
        self.records = store.list_all().context("failed to reload workouts")?;
        self.ensure_in_bounds();
        Ok(())
    }

    pub(crate) fn current_record(&self) -> Option<&WorkoutRecord> {
        self.records.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        if self.records.is_empty() {
            self.selected = 0;
            return;
        }
        let len = self.records.len() as isize;
        let next = (self.selected as isize + delta).clamp(0, len - 1);
        self.selected = next as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.records.len().saturating_sub(1);
    }

    /// Give keyboard focus to the form, landing on `field`.
    pub(crate) fn focus_form(&mut self, field: WorkoutField) {
        self.focus = Focus::Form;
        self.form.focus(field);
    }

    /// Move focus off the form and onto the record list.
    pub(crate) fn focus_list(&mut self) {
        self.focus = Focus::List;
    }

    fn ensure_in_bounds(&mut self) {
        if self.records.is_empty() {
            self.selected = 0;
        } else {
            self.selected = min(self.selected, self.records.len() - 1);
        }
    }
}
