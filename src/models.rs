use chrono::NaiveDateTime;
use std::fmt;

/// Format used when showing date-times to the user, e.g. `Mar 01 2024 18:00`
pub const DISPLAY_FORMAT: &str = "%b %d %Y %H:%M";

/// Variant-specific part of a task. Fixed once the task is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline { by: NaiveDateTime },
    Event { start: NaiveDateTime, end: NaiveDateTime },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub kind: TaskKind,
    pub done: bool,
    pub high_priority: bool,
}

impl Task {
    pub fn new(description: String, kind: TaskKind) -> Self {
        Self {
            description,
            kind,
            done: false,
            high_priority: false,
        }
    }

    pub fn todo(description: impl Into<String>) -> Self {
        Self::new(description.into(), TaskKind::Todo)
    }

    pub fn deadline(description: impl Into<String>, by: NaiveDateTime) -> Self {
        Self::new(description.into(), TaskKind::Deadline { by })
    }

    pub fn event(description: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(description.into(), TaskKind::Event { start, end })
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn unmark_done(&mut self) {
        self.done = false;
    }

    pub fn mark_high_priority(&mut self) {
        self.high_priority = true;
    }

    pub fn unmark_high_priority(&mut self) {
        self.high_priority = false;
    }

    /// Single-letter tag shared by the display form and the persisted line
    pub fn type_tag(&self) -> char {
        match self.kind {
            TaskKind::Todo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.high_priority {
            write!(f, "[!]")?;
        }
        let status = if self.done { 'X' } else { ' ' };
        write!(f, "[{}][{}] {}", self.type_tag(), status, self.description)?;
        match &self.kind {
            TaskKind::Todo => Ok(()),
            TaskKind::Deadline { by } => write!(f, " (by: {})", by.format(DISPLAY_FORMAT)),
            TaskKind::Event { start, end } => write!(
                f,
                " (from: {} to: {})",
                start.format(DISPLAY_FORMAT),
                end.format(DISPLAY_FORMAT)
            ),
        }
    }
}
