//! Aggregated counts and recent activity for the dashboard.

use crate::model::{EntityKind, Note, Task};
use crate::repo::note_repo::{parse_note_row, NOTE_SELECT_SQL};
use crate::repo::task_repo::{parse_task_row, TASK_SELECT_SQL};
use crate::repo::{expect_migrated_connection, RepoResult};
use rusqlite::Connection;
use serde::Serialize;

/// How many recent tasks and notes the dashboard shows.
pub const RECENT_LIMIT: u32 = 5;

/// One read model covering everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub task_count: u64,
    pub category_count: u64,
    pub priority_count: u64,
    pub subtask_count: u64,
    pub note_count: u64,
    /// Newest tasks first, at most [`RECENT_LIMIT`].
    pub recent_tasks: Vec<Task>,
    /// Newest notes first, at most [`RECENT_LIMIT`].
    pub recent_notes: Vec<Note>,
}

pub fn count_entities(conn: &Connection, kind: EntityKind) -> RepoResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {};", kind.table()),
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

pub fn load_dashboard_summary(conn: &Connection) -> RepoResult<DashboardSummary> {
    expect_migrated_connection(conn)?;

    let mut recent_tasks = Vec::new();
    {
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY t.created_at DESC, t.uuid ASC LIMIT ?1;"
        ))?;
        let mut rows = stmt.query([RECENT_LIMIT])?;
        while let Some(row) = rows.next()? {
            recent_tasks.push(parse_task_row(row)?);
        }
    }

    let mut recent_notes = Vec::new();
    {
        let mut stmt = conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY created_at DESC, uuid ASC LIMIT ?1;"
        ))?;
        let mut rows = stmt.query([RECENT_LIMIT])?;
        while let Some(row) = rows.next()? {
            recent_notes.push(parse_note_row(row)?);
        }
    }

    Ok(DashboardSummary {
        task_count: count_entities(conn, EntityKind::Task)?,
        category_count: count_entities(conn, EntityKind::Category)?,
        priority_count: count_entities(conn, EntityKind::Priority)?,
        subtask_count: count_entities(conn, EntityKind::SubTask)?,
        note_count: count_entities(conn, EntityKind::Note)?,
        recent_tasks,
        recent_notes,
    })
}
