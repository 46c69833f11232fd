//! Business orchestration over the repository layer.
//!
//! # Responsibility
//! - Pair every domain operation with an [`AuthorizedSession`] proof.
//! - Keep request shaping (note previews, must-exist lookups) out of
//!   the persistence code.
//!
//! # Invariants
//! - Services never touch SQL directly; all storage access goes
//!   through a repository contract.
//! - A `get_*` call on a missing id is an error here, not a `None`.
//!
//! [`AuthorizedSession`]: crate::auth::AuthorizedSession

pub mod dashboard;
pub mod label_service;
pub mod note_service;
pub mod subtask_service;
pub mod task_service;
