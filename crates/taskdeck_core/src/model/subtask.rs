//! SubTask domain model.
//!
//! A subtask is a child work item scoped to exactly one owning task. The
//! owning task must exist when the subtask is created; deleting the task
//! removes its subtasks.

use crate::model::task::{TaskId, TaskStatus};
use crate::model::FieldError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a subtask record.
pub type SubTaskId = Uuid;

/// Child work item owned by one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub uuid: SubTaskId,
    pub title: String,
    pub status: TaskStatus,
    /// Owning task. Required, enforced at create/update time.
    pub parent_task_uuid: TaskId,
    /// Unix epoch milliseconds, assigned by storage at insert.
    pub created_at: i64,
}

/// Caller-supplied mutable fields for subtask create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTaskDraft {
    pub title: String,
    pub status: TaskStatus,
    pub parent_task_uuid: TaskId,
}

impl SubTaskDraft {
    /// Creates a pending draft under the given owning task.
    pub fn new(parent_task_uuid: TaskId, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: TaskStatus::default(),
            parent_task_uuid,
        }
    }

    /// Field-level problems that can be detected without storage access.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::required("title"));
        }
        errors
    }
}
