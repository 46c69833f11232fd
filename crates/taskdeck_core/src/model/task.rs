//! Task domain model.
//!
//! # Responsibility
//! - Define the primary work item record and its draft shape.
//! - Own the shared three-state status enumeration.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another task.
//! - `status` only ever holds one of the three enumerated values.
//! - Category/priority references are optional and may dangle to `None`
//!   when the referenced label is deleted, never to a missing row.

use crate::model::label::LabelId;
use crate::model::FieldError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task record.
pub type TaskId = Uuid;

/// Lifecycle state shared by tasks and subtasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Pending,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Completed,
}

impl TaskStatus {
    /// Storage/wire token for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a storage/wire token. Unknown tokens yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Human-facing name for list/detail rendering.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// Primary work item with optional deadline and label references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for linking and auditing.
    pub uuid: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Unix epoch milliseconds.
    pub deadline: Option<i64>,
    /// Reference into `priorities`. `None` when unset or after label delete.
    pub priority_uuid: Option<LabelId>,
    /// Reference into `categories`. `None` when unset or after label delete.
    pub category_uuid: Option<LabelId>,
    /// Unix epoch milliseconds, assigned by storage at insert.
    pub created_at: i64,
}

/// Caller-supplied mutable fields for task create and full update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub deadline: Option<i64>,
    pub priority_uuid: Option<LabelId>,
    pub category_uuid: Option<LabelId>,
}

impl TaskDraft {
    /// Creates a pending draft with only the title set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Field-level problems that can be detected without storage access.
    ///
    /// Reference resolvability is checked by the repository, which merges
    /// its findings into the same error list.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::required("title"));
        }
        errors
    }
}
