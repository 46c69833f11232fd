//! Task CRUD behavior against a real in-memory database.

use rusqlite::Connection;
use taskdeck_core::{
    open_db_in_memory, LabelDraft, LabelKind, LabelRepository, NoteDraft, NoteRepository,
    RepoError, SqliteLabelRepository, SqliteNoteRepository, SqliteSubTaskRepository,
    SqliteTaskRepository, SubTaskDraft, SubTaskRepository, TaskDraft, TaskRepository, TaskStatus,
};
use uuid::Uuid;

fn test_conn() -> Connection {
    open_db_in_memory().unwrap()
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_task_round_trips_all_fields() {
    let mut conn = test_conn();
    let (category, priority) = {
        let labels = SqliteLabelRepository::try_new(&mut conn).unwrap();
        (
            labels
                .create_label(LabelKind::Category, &LabelDraft::new("Work"))
                .unwrap(),
            labels
                .create_label(LabelKind::Priority, &LabelDraft::new("High"))
                .unwrap(),
        )
    };

    let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let mut draft = TaskDraft::new("Ship release");
    draft.description = Some("cut the tag, then publish artifacts".to_string());
    draft.status = TaskStatus::InProgress;
    draft.deadline = Some(1_736_000_000_000);
    draft.category_uuid = Some(category.uuid);
    draft.priority_uuid = Some(priority.uuid);

    let task = repo.create_task(&draft).unwrap();
    assert_eq!(task.title, "Ship release");
    assert_eq!(
        task.description.as_deref(),
        Some("cut the tag, then publish artifacts")
    );
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.deadline, Some(1_736_000_000_000));
    assert_eq!(task.category_uuid, Some(category.uuid));
    assert_eq!(task.priority_uuid, Some(priority.uuid));
    assert!(task.created_at > 0);

    let loaded = repo.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(loaded, task);
}

#[test]
fn title_is_trimmed_before_storage() {
    let mut conn = test_conn();
    let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let task = repo.create_task(&TaskDraft::new("  Buy groceries  ")).unwrap();
    assert_eq!(task.title, "Buy groceries");
}

#[test]
fn blank_title_and_dead_references_fail_together() {
    let mut conn = test_conn();
    let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();

    let mut draft = TaskDraft::new("   ");
    draft.category_uuid =
        Some(Uuid::parse_str("00000000-0000-4000-8000-0000000000aa").unwrap());
    draft.priority_uuid =
        Some(Uuid::parse_str("00000000-0000-4000-8000-0000000000bb").unwrap());

    match repo.create_task(&draft).unwrap_err() {
        RepoError::Validation(validation) => {
            assert_eq!(validation.fields.len(), 3);
            assert!(validation.has_field("title"));
            assert!(validation.has_field("category"));
            assert!(validation.has_field("priority"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(count_rows(&conn, "tasks"), 0);
}

#[test]
fn update_replaces_every_mutable_field() {
    let mut conn = test_conn();
    let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let task = repo.create_task(&TaskDraft::new("Draft report")).unwrap();

    let mut draft = TaskDraft::new("Draft quarterly report");
    draft.status = TaskStatus::Completed;
    draft.deadline = Some(1_737_000_000_000);
    let updated = repo.update_task(task.uuid, &draft).unwrap();

    assert_eq!(updated.uuid, task.uuid);
    assert_eq!(updated.title, "Draft quarterly report");
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.deadline, Some(1_737_000_000_000));
    assert_eq!(updated.created_at, task.created_at);
}

#[test]
fn updating_a_missing_task_reports_not_found_before_validation() {
    let mut conn = test_conn();
    let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let missing = Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap();

    // Draft is also invalid; the missing target must win.
    let err = repo.update_task(missing, &TaskDraft::new("")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id, .. } if id == missing));
}

#[test]
fn deleting_a_task_removes_its_subtasks_and_notes() {
    let mut conn = test_conn();
    let task_id = {
        let repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
        repo.create_task(&TaskDraft::new("Plan the move")).unwrap().uuid
    };
    {
        let subtasks = SqliteSubTaskRepository::try_new(&conn).unwrap();
        subtasks
            .create_subtask(&SubTaskDraft::new(task_id, "Pack boxes"))
            .unwrap();
        subtasks
            .create_subtask(&SubTaskDraft::new(task_id, "Book the van"))
            .unwrap();
    }
    {
        let notes = SqliteNoteRepository::try_new(&conn).unwrap();
        notes
            .create_note(&NoteDraft::new(task_id, "Elevator is booked for 9am"), None)
            .unwrap();
    }

    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    repo.delete_task(task_id).unwrap();
    assert!(repo.get_task(task_id).unwrap().is_none());
    drop(repo);

    assert_eq!(count_rows(&conn, "subtasks"), 0);
    assert_eq!(count_rows(&conn, "notes"), 0);
}

#[test]
fn deleting_a_missing_task_reports_not_found() {
    let mut conn = test_conn();
    let mut repo = SqliteTaskRepository::try_new(&mut conn).unwrap();
    let missing = Uuid::parse_str("00000000-0000-4000-8000-000000000002").unwrap();
    assert!(matches!(
        repo.delete_task(missing).unwrap_err(),
        RepoError::NotFound { id, .. } if id == missing
    ));
}
