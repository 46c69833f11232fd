//! Dashboard summary: entity counts plus capped recent activity.

use rusqlite::{params, Connection};
use std::sync::Arc;
use taskdeck_core::{
    dashboard_summary, open_db_in_memory, AccessGate, AuthorizedSession, FixedTokenProvider,
    LabelDraft, LabelKind, LabelRepository, NoteDraft, NoteRepository, Session,
    SqliteLabelRepository, SqliteNoteRepository, SqliteSubTaskRepository, SqliteTaskRepository,
    SubTaskDraft, SubTaskRepository, TaskDraft, TaskRepository, RECENT_LIMIT,
};
use uuid::Uuid;

fn test_conn() -> Connection {
    open_db_in_memory().unwrap()
}

fn granted() -> AuthorizedSession {
    let gate = AccessGate::new(Arc::new(FixedTokenProvider::new("itest")));
    gate.authorize(&Session::with_token("itest")).unwrap()
}

fn pin_created_at(conn: &Connection, table: &str, id: Uuid, created_at: i64) {
    conn.execute(
        &format!("UPDATE {table} SET created_at = ?1 WHERE uuid = ?2;"),
        params![created_at, id.to_string()],
    )
    .unwrap();
}

#[test]
fn summary_counts_every_entity_kind() {
    let mut conn = test_conn();
    {
        let labels = SqliteLabelRepository::try_new(&mut conn).unwrap();
        labels
            .create_label(LabelKind::Category, &LabelDraft::new("Work"))
            .unwrap();
        labels
            .create_label(LabelKind::Priority, &LabelDraft::new("High"))
            .unwrap();
        labels
            .create_label(LabelKind::Priority, &LabelDraft::new("Low"))
            .unwrap();
    }
    let task_id = {
        let tasks = SqliteTaskRepository::try_new(&mut conn).unwrap();
        let id = tasks.create_task(&TaskDraft::new("First")).unwrap().uuid;
        tasks.create_task(&TaskDraft::new("Second")).unwrap();
        id
    };
    {
        let subtasks = SqliteSubTaskRepository::try_new(&conn).unwrap();
        subtasks
            .create_subtask(&SubTaskDraft::new(task_id, "step"))
            .unwrap();
    }
    {
        let notes = SqliteNoteRepository::try_new(&conn).unwrap();
        notes
            .create_note(&NoteDraft::new(task_id, "remember this"), Some("remember this"))
            .unwrap();
    }

    let summary = dashboard_summary(&conn, &granted()).unwrap();
    assert_eq!(summary.task_count, 2);
    assert_eq!(summary.category_count, 1);
    assert_eq!(summary.priority_count, 2);
    assert_eq!(summary.subtask_count, 1);
    assert_eq!(summary.note_count, 1);
}

#[test]
fn recent_lists_cap_at_the_limit_newest_first() {
    let mut conn = test_conn();
    let task_ids = {
        let tasks = SqliteTaskRepository::try_new(&mut conn).unwrap();
        (1..=7)
            .map(|i| {
                tasks
                    .create_task(&TaskDraft::new(format!("Task {i}")))
                    .unwrap()
                    .uuid
            })
            .collect::<Vec<_>>()
    };
    for (index, id) in task_ids.iter().enumerate() {
        pin_created_at(&conn, "tasks", *id, (index as i64 + 1) * 1_000);
    }
    {
        let notes = SqliteNoteRepository::try_new(&conn).unwrap();
        let note_ids = (1..=6)
            .map(|i| {
                let preview = format!("note {i}");
                notes
                    .create_note(
                        &NoteDraft::new(task_ids[0], preview.clone()),
                        Some(preview.as_str()),
                    )
                    .unwrap()
                    .uuid
            })
            .collect::<Vec<_>>();
        for (index, id) in note_ids.iter().enumerate() {
            pin_created_at(&conn, "notes", *id, (index as i64 + 1) * 1_000);
        }
    }

    let summary = dashboard_summary(&conn, &granted()).unwrap();
    assert_eq!(summary.recent_tasks.len(), RECENT_LIMIT as usize);
    let titles: Vec<&str> = summary
        .recent_tasks
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Task 7", "Task 6", "Task 5", "Task 4", "Task 3"]);

    assert_eq!(summary.recent_notes.len(), RECENT_LIMIT as usize);
    assert_eq!(summary.recent_notes[0].preview.as_deref(), Some("note 6"));
}

#[test]
fn empty_database_yields_zero_counts_and_empty_recents() {
    let conn = test_conn();
    let summary = dashboard_summary(&conn, &granted()).unwrap();
    assert_eq!(summary.task_count, 0);
    assert_eq!(summary.note_count, 0);
    assert!(summary.recent_tasks.is_empty());
    assert!(summary.recent_notes.is_empty());
}

#[test]
fn summary_serializes_with_stable_field_names() {
    let conn = test_conn();
    let summary = dashboard_summary(&conn, &granted()).unwrap();
    let encoded = serde_json::to_value(&summary).unwrap();
    for key in [
        "task_count",
        "category_count",
        "priority_count",
        "subtask_count",
        "note_count",
        "recent_tasks",
        "recent_notes",
    ] {
        assert!(encoded.get(key).is_some(), "missing key {key}");
    }
}
