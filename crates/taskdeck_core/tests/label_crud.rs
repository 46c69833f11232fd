//! Category/priority CRUD and the task-detach behavior on delete.

use rusqlite::Connection;
use taskdeck_core::{
    open_db_in_memory, EntityKind, LabelDraft, LabelKind, LabelRepository, RepoError,
    SqliteLabelRepository, SqliteTaskRepository, TaskDraft, TaskRepository,
};
use uuid::Uuid;

fn test_conn() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn create_and_rename_labels_on_both_sides() {
    let mut conn = test_conn();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();

    let category = repo
        .create_label(LabelKind::Category, &LabelDraft::new("Wrok"))
        .unwrap();
    let renamed = repo
        .update_label(LabelKind::Category, category.uuid, &LabelDraft::new("Work"))
        .unwrap();
    assert_eq!(renamed.uuid, category.uuid);
    assert_eq!(renamed.name, "Work");
    assert_eq!(renamed.created_at, category.created_at);

    let priority = repo
        .create_label(LabelKind::Priority, &LabelDraft::new("  High  "))
        .unwrap();
    assert_eq!(priority.name, "High");
    assert_eq!(
        repo.get_label(LabelKind::Priority, priority.uuid)
            .unwrap()
            .unwrap()
            .name,
        "High"
    );
}

#[test]
fn blank_names_are_rejected_for_both_kinds() {
    let mut conn = test_conn();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    for kind in [LabelKind::Category, LabelKind::Priority] {
        match repo.create_label(kind, &LabelDraft::new("   ")).unwrap_err() {
            RepoError::Validation(validation) => assert!(validation.has_field("name")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn find_by_name_matches_exactly_not_by_substring() {
    let mut conn = test_conn();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    repo.create_label(LabelKind::Category, &LabelDraft::new("Work"))
        .unwrap();
    repo.create_label(LabelKind::Category, &LabelDraft::new("Workout"))
        .unwrap();

    let found = repo
        .find_label_by_name(LabelKind::Category, "Work")
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Work");
    assert!(repo
        .find_label_by_name(LabelKind::Category, "ork")
        .unwrap()
        .is_none());
    // The two label kinds do not share a namespace.
    assert!(repo
        .find_label_by_name(LabelKind::Priority, "Work")
        .unwrap()
        .is_none());
}

#[test]
fn duplicate_names_are_allowed() {
    let mut conn = test_conn();
    let repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    let first = repo
        .create_label(LabelKind::Category, &LabelDraft::new("Personal"))
        .unwrap();
    let second = repo
        .create_label(LabelKind::Category, &LabelDraft::new("Personal"))
        .unwrap();
    assert_ne!(first.uuid, second.uuid);

    let found = repo
        .find_label_by_name(LabelKind::Category, "Personal")
        .unwrap()
        .unwrap();
    assert!(found.uuid == first.uuid || found.uuid == second.uuid);
}

#[test]
fn deleting_a_label_detaches_tasks_but_keeps_the_other_side() {
    let mut conn = test_conn();
    let (work, high) = {
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
    let task_id = {
        let tasks = SqliteTaskRepository::try_new(&mut conn).unwrap();
        let mut draft = TaskDraft::new("Ship release");
        draft.category_uuid = Some(work.uuid);
        draft.priority_uuid = Some(high.uuid);
        tasks.create_task(&draft).unwrap().uuid
    };

    {
        let mut labels = SqliteLabelRepository::try_new(&mut conn).unwrap();
        labels.delete_label(LabelKind::Category, work.uuid).unwrap();
        assert!(labels
            .get_label(LabelKind::Category, work.uuid)
            .unwrap()
            .is_none());
    }
    {
        let tasks = SqliteTaskRepository::try_new(&mut conn).unwrap();
        let task = tasks.get_task(task_id).unwrap().unwrap();
        assert_eq!(task.category_uuid, None);
        assert_eq!(task.priority_uuid, Some(high.uuid));
        assert_eq!(task.title, "Ship release");
    }

    {
        let mut labels = SqliteLabelRepository::try_new(&mut conn).unwrap();
        labels.delete_label(LabelKind::Priority, high.uuid).unwrap();
    }
    {
        let tasks = SqliteTaskRepository::try_new(&mut conn).unwrap();
        let task = tasks.get_task(task_id).unwrap().unwrap();
        assert_eq!(task.category_uuid, None);
        assert_eq!(task.priority_uuid, None);
    }
}

#[test]
fn deleting_a_missing_label_names_the_right_kind() {
    let mut conn = test_conn();
    let mut repo = SqliteLabelRepository::try_new(&mut conn).unwrap();
    let missing = Uuid::parse_str("00000000-0000-4000-8000-000000000003").unwrap();
    match repo.delete_label(LabelKind::Priority, missing).unwrap_err() {
        RepoError::NotFound { kind, id } => {
            assert_eq!(kind, EntityKind::Priority);
            assert_eq!(id, missing);
        }
        other => panic!("expected not-found error, got {other:?}"),
    }
}
