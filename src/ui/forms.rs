use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::ValidationError;
use crate::models::NewWorkout;

/// Fields available within the workout form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum WorkoutField {
    #[default]
    Activity,
    Duration,
    Category,
    Partner,
}

impl WorkoutField {
    pub(crate) const ALL: [WorkoutField; 4] = [
        WorkoutField::Activity,
        WorkoutField::Duration,
        WorkoutField::Category,
        WorkoutField::Partner,
    ];

    /// Label shown in front of the input.
    pub(crate) fn label(self) -> &'static str {
        match self {
            WorkoutField::Activity => "Activity",
            WorkoutField::Duration => "Duration (min, numeric)",
            WorkoutField::Category => "Category",
            WorkoutField::Partner => "Training partner",
        }
    }

    /// Greyed-out hint rendered while the field is empty.
    pub(crate) fn placeholder(self) -> &'static str {
        match self {
            WorkoutField::Activity => "Weights, Running, ...",
            WorkoutField::Duration => "45, 30, 15, ...",
            WorkoutField::Category => "Cardio, Strength, ...",
            WorkoutField::Partner => "Bruna, Gustavo, ...",
        }
    }

    /// Name used in validation messages.
    fn name(self) -> &'static str {
        match self {
            WorkoutField::Activity => "activity",
            WorkoutField::Duration => "duration",
            WorkoutField::Category => "category",
            WorkoutField::Partner => "partner",
        }
    }

    fn required(self) -> bool {
        !matches!(self, WorkoutField::Partner)
    }

    fn index(self) -> usize {
        match self {
            WorkoutField::Activity => 0,
            WorkoutField::Duration => 1,
            WorkoutField::Category => 2,
            WorkoutField::Partner => 3,
        }
    }

    /// Following field, or `None` when leaving the last one.
    pub(crate) fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Preceding field, or `None` when leaving the first one.
    pub(crate) fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|idx| Self::ALL[idx])
    }
}

/// Uncommitted input for a new workout. Values stay exactly as typed until
/// `submission` trims them.
#[derive(Default, Clone, Debug)]
pub(crate) struct WorkoutForm {
    pub(crate) activity: String,
    pub(crate) duration: String,
    pub(crate) category: String,
    pub(crate) partner: String,
    pub(crate) active: WorkoutField,
}

impl WorkoutForm {
    /// Switch focus to a particular field.
    pub(crate) fn focus(&mut self, field: WorkoutField) {
        self.active = field;
    }

    pub(crate) fn value(&self, field: WorkoutField) -> &str {
        match field {
            WorkoutField::Activity => &self.activity,
            WorkoutField::Duration => &self.duration,
            WorkoutField::Category => &self.category,
            WorkoutField::Partner => &self.partner,
        }
    }

    fn value_mut(&mut self, field: WorkoutField) -> &mut String {
        match field {
            WorkoutField::Activity => &mut self.activity,
            WorkoutField::Duration => &mut self.duration,
            WorkoutField::Category => &mut self.category,
            WorkoutField::Partner => &mut self.partner,
        }
    }

    /// Append a character to the active field. Control characters are
    /// ignored; the duration field takes any printable text.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Trim every field and check the required ones. On failure the form is
    /// left exactly as the user typed it.
    pub(crate) fn submission(&self) -> Result<NewWorkout, ValidationError> {
        let missing: Vec<&'static str> = WorkoutField::ALL
            .into_iter()
            .filter(|field| field.required() && self.value(*field).trim().is_empty())
            .map(WorkoutField::name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(NewWorkout::new(
            self.activity.trim(),
            self.duration.trim(),
            self.category.trim(),
            self.partner.trim(),
        ))
    }

    /// Empty all inputs after a successful save and park focus on the first
    /// field for the next entry.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn is_empty(&self) -> bool {
        WorkoutField::ALL
            .into_iter()
            .all(|field| self.value(field).is_empty())
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: WorkoutField, focused: bool) -> Line<'static> {
        let value = self.value(field);
        let is_active = focused && self.active == field;

        let (display, style) = if value.is_empty() {
            (
                field.placeholder().to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else if is_active {
            (value.to_string(), Style::default().fg(Color::Yellow))
        } else {
            (value.to_string(), Style::default())
        };

        let label_style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(format!("{}: ", field.label()), label_style),
            Span::styled(display, style),
        ])
    }

    /// Column offset of the cursor inside a rendered line for `field`.
    pub(crate) fn cursor_offset(&self, field: WorkoutField) -> u16 {
        let prefix = field.label().chars().count() + 2;
        (prefix + self.value(field).chars().count()) as u16
    }
}
