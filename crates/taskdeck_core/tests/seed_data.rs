//! Demo seeding: fixed volumes, label reuse and determinism.

use rusqlite::Connection;
use taskdeck_core::seed::{
    NOTES_PER_TASK, SEED_CATEGORIES, SEED_PRIORITIES, SEED_TASK_COUNT, SUBTASKS_PER_TASK,
};
use taskdeck_core::{
    open_db_in_memory, seed_demo_data, ListQuery, SeedOptions, SqliteTaskRepository,
    TaskRepository,
};

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn all_task_titles(conn: &mut Connection) -> Vec<String> {
    let repo = SqliteTaskRepository::try_new(conn).unwrap();
    let query = ListQuery {
        sort: Some("title_asc".to_string()),
        ..ListQuery::default()
    };
    repo.list_tasks(&query)
        .unwrap()
        .items
        .into_iter()
        .map(|task| task.title)
        .collect()
}

#[test]
fn first_run_fills_an_empty_database() {
    let mut conn = open_db_in_memory().unwrap();
    let report = seed_demo_data(&mut conn, &SeedOptions::default()).unwrap();

    assert_eq!(report.categories_created as usize, SEED_CATEGORIES.len());
    assert_eq!(report.priorities_created as usize, SEED_PRIORITIES.len());
    assert_eq!(report.tasks_created, SEED_TASK_COUNT);
    assert_eq!(report.subtasks_created, SEED_TASK_COUNT * SUBTASKS_PER_TASK);
    assert_eq!(report.notes_created, SEED_TASK_COUNT * NOTES_PER_TASK);

    assert_eq!(count_rows(&conn, "categories") as usize, SEED_CATEGORIES.len());
    assert_eq!(count_rows(&conn, "priorities") as usize, SEED_PRIORITIES.len());
    assert_eq!(count_rows(&conn, "tasks") as u32, SEED_TASK_COUNT);
    assert_eq!(
        count_rows(&conn, "subtasks") as u32,
        SEED_TASK_COUNT * SUBTASKS_PER_TASK
    );
    assert_eq!(
        count_rows(&conn, "notes") as u32,
        SEED_TASK_COUNT * NOTES_PER_TASK
    );

    for name in SEED_CATEGORIES {
        let found: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM categories WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(found, 1, "category {name} missing");
    }
}

#[test]
fn second_run_reuses_labels_but_adds_tasks() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn, &SeedOptions::default()).unwrap();
    let second = seed_demo_data(&mut conn, &SeedOptions::default()).unwrap();

    assert_eq!(second.categories_created, 0);
    assert_eq!(second.priorities_created, 0);
    assert_eq!(second.tasks_created, SEED_TASK_COUNT);

    assert_eq!(count_rows(&conn, "categories") as usize, SEED_CATEGORIES.len());
    assert_eq!(count_rows(&conn, "priorities") as usize, SEED_PRIORITIES.len());
    assert_eq!(count_rows(&conn, "tasks") as u32, 2 * SEED_TASK_COUNT);
}

#[test]
fn the_same_seed_produces_the_same_data() {
    let mut first = open_db_in_memory().unwrap();
    let mut second = open_db_in_memory().unwrap();
    seed_demo_data(&mut first, &SeedOptions { seed: 42 }).unwrap();
    seed_demo_data(&mut second, &SeedOptions { seed: 42 }).unwrap();

    assert_eq!(all_task_titles(&mut first), all_task_titles(&mut second));
}

#[test]
fn seeded_notes_carry_previews() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn, &SeedOptions::default()).unwrap();

    let without_preview: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM notes WHERE preview IS NULL OR preview = '';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(without_preview, 0);
}
