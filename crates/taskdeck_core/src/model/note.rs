//! Note domain model.
//!
//! A note is a free-text annotation scoped to exactly one task. The stored
//! `preview` is a short title derived from the content on every write; it
//! exists so list views can show and sort notes by something title-like
//! without a user-maintained title field.

use crate::model::task::TaskId;
use crate::model::FieldError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note record.
pub type NoteId = Uuid;

/// Free-text annotation owned by one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: NoteId,
    /// Owning task. Required, enforced at create/update time.
    pub task_uuid: TaskId,
    pub content: String,
    /// Derived display title, recomputed from `content` on every write.
    pub preview: Option<String>,
    /// Unix epoch milliseconds, assigned by storage at insert.
    pub created_at: i64,
}

/// Caller-supplied mutable fields for note create and full update.
///
/// `preview` is not part of the draft: the service derives it from the
/// content before handing the write to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub task_uuid: TaskId,
    pub content: String,
}

impl NoteDraft {
    pub fn new(task_uuid: TaskId, content: impl Into<String>) -> Self {
        Self {
            task_uuid,
            content: content.into(),
        }
    }

    /// Field-level problems that can be detected without storage access.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.content.trim().is_empty() {
            errors.push(FieldError::required("content"));
        }
        errors
    }
}
