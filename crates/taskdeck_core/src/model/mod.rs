//! Domain model for tasks, labels, subtasks and notes.
//!
//! # Responsibility
//! - Define the canonical records and draft types used by core logic.
//! - Hold the shared validation vocabulary (per-field errors).
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - `created_at` is assigned by storage and never changed afterwards.
//! - Drafts carry every mutable field; updates replace the full record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod label;
pub mod note;
pub mod subtask;
pub mod task;

pub use label::{Label, LabelDraft, LabelId, LabelKind};
pub use note::{Note, NoteDraft, NoteId};
pub use subtask::{SubTask, SubTaskDraft, SubTaskId};
pub use task::{Task, TaskDraft, TaskId, TaskStatus};

/// Dispatch tag naming one of the five stored entity types.
///
/// Used wherever behavior is selected per entity instead of per concrete
/// type: not-found errors, table resolution, dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Category,
    Priority,
    SubTask,
    Note,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Category => "category",
            Self::Priority => "priority",
            Self::SubTask => "subtask",
            Self::Note => "note",
        }
    }

    /// Storage table backing this entity type.
    pub fn table(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::Category => "categories",
            Self::Priority => "priorities",
            Self::SubTask => "subtasks",
            Self::Note => "notes",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One offending field with a caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "this field is required".to_string(),
        }
    }

    pub fn unknown_reference(field: &'static str, id: Uuid) -> Self {
        Self {
            field,
            message: format!("referenced record does not exist: {id}"),
        }
    }
}

/// All field failures for one rejected operation.
///
/// Writes collect every offending field before returning, so a caller can
/// render the complete set in one pass instead of fixing fields one by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    /// Names of the offending fields, in reported order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|entry| entry.field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|entry| entry.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (index, entry) in self.fields.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{}: {}", entry.field, entry.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{EntityKind, FieldError, ValidationError};
    use uuid::Uuid;

    #[test]
    fn entity_kind_maps_to_storage_tables() {
        assert_eq!(EntityKind::Task.table(), "tasks");
        assert_eq!(EntityKind::Category.table(), "categories");
        assert_eq!(EntityKind::Priority.table(), "priorities");
        assert_eq!(EntityKind::SubTask.table(), "subtasks");
        assert_eq!(EntityKind::Note.table(), "notes");
    }

    #[test]
    fn validation_error_lists_every_offending_field() {
        let error = ValidationError::new(vec![
            FieldError::required("title"),
            FieldError::unknown_reference("category", Uuid::nil()),
        ]);

        assert_eq!(error.field_names(), vec!["title", "category"]);
        assert!(error.has_field("category"));
        assert!(!error.has_field("priority"));

        let rendered = error.to_string();
        assert!(rendered.contains("title: this field is required"));
        assert!(rendered.contains("category: referenced record does not exist"));
    }
}
