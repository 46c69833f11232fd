//! Core domain logic for TaskDeck, a personal task manager backed by
//! SQLite.
//!
//! Layers, bottom to top:
//! - [`model`]: plain data types, drafts and field validation.
//! - [`db`]: connection bootstrap and schema migrations.
//! - [`repo`]: SQL persistence with filtered, paginated listing.
//! - [`service`]: gated operations callers talk to.
//! - [`auth`]: the access gate producing session proofs.
//! - [`seed`]: deterministic demo data for development.
//! - [`logging`]: rotated `key=value` file logs.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use auth::{
    AccessGate, AuthorizedSession, FixedTokenProvider, IdentityProvider, LoginRedirect, Session,
    DEFAULT_LOGIN_URL,
};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{
    default_log_level, flush_logs, init_logging, logging_status, LoggingError, LoggingStatus,
};
pub use model::{
    EntityKind, FieldError, Label, LabelDraft, LabelId, LabelKind, Note, NoteDraft, NoteId,
    SubTask, SubTaskDraft, SubTaskId, Task, TaskDraft, TaskId, TaskStatus, ValidationError,
};
pub use repo::label_repo::{LabelRepository, SqliteLabelRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::subtask_repo::{SqliteSubTaskRepository, SubTaskRepository};
pub use repo::summary::{DashboardSummary, RECENT_LIMIT};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{ListQuery, Page, RepoError, RepoResult, PAGE_SIZE};
pub use seed::{seed_demo_data, SeedOptions, SeedReport};
pub use service::dashboard::dashboard_summary;
pub use service::label_service::LabelService;
pub use service::note_service::{derive_note_preview, NoteService, PREVIEW_MAX_CHARS};
pub use service::subtask_service::SubTaskService;
pub use service::task_service::TaskService;

/// Version of the core crate, as baked in at compile time.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
