//! Category/priority label model.
//!
//! Categories and priorities are shape-identical classification tags, so one
//! record type serves both; `LabelKind` selects which table an operation
//! targets. Names are not unique, duplicates are permitted.

use crate::model::{EntityKind, FieldError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a category or priority record.
pub type LabelId = Uuid;

/// Selects which label table an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Category,
    Priority,
}

impl LabelKind {
    /// Storage table for this label kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Priority => "priorities",
        }
    }

    /// Column on `tasks` that references this label kind.
    pub fn task_column(self) -> &'static str {
        match self {
            Self::Category => "category_uuid",
            Self::Priority => "priority_uuid",
        }
    }

    pub fn entity_kind(self) -> EntityKind {
        match self {
            Self::Category => EntityKind::Category,
            Self::Priority => EntityKind::Priority,
        }
    }
}

/// Classification tag attachable to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub uuid: LabelId,
    pub name: String,
    /// Unix epoch milliseconds, assigned by storage at insert.
    pub created_at: i64,
}

/// Caller-supplied mutable fields for label create and full update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDraft {
    pub name: String,
}

impl LabelDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Field-level problems that can be detected without storage access.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::required("name"));
        }
        errors
    }
}
