// Note entity and write inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted note
///
/// `id` and `date` are assigned by the store on creation and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    pub important: bool,
    pub date: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub content: String,
    pub important: bool,
    pub date: DateTime<Utc>,
}

impl NewNote {
    /// New note stamped with the current time, not important
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            important: false,
            date: Utc::now(),
        }
    }

    #[must_use]
    pub const fn important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    #[must_use]
    pub const fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Attach a store-assigned id
    pub fn into_note(self, id: String) -> Note {
        Note {
            id,
            content: self.content,
            important: self.important,
            date: self.date,
        }
    }
}

/// Partial update: `None` leaves the field as it is
///
/// There is no way to express a change of `id` or `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub important: Option<bool>,
}

impl NotePatch {
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.important.is_none()
    }

    /// Apply the patch in place
    pub fn apply(self, note: &mut Note) {
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(important) = self.important {
            note.important = important;
        }
    }
}
