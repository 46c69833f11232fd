//! SQLite persistence for tasks.
//!
//! # Responsibility
//! - CRUD plus filtered, sorted, paginated listing of tasks.
//! - Enforce referential checks on priority/category before writing.
//! - Delete a task together with its subtasks and notes in one
//!   transaction.
//!
//! # Invariants
//! - `create_task`/`update_task` report all field problems at once.
//! - Priority ordering works off the joined priority name; tasks
//!   without a priority group together at one end.

use crate::model::{EntityKind, FieldError, Task, TaskDraft, TaskId, TaskStatus};
use crate::repo::{
    expect_migrated_connection, expect_table, like_pattern, parse_uuid, row_exists, ListQuery,
    Page, RepoError, RepoResult, PAGE_SIZE,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use uuid::Uuid;

pub(crate) const TASK_SELECT_SQL: &str = "SELECT
    t.uuid AS uuid,
    t.title AS title,
    t.description AS description,
    t.status AS status,
    t.deadline AS deadline,
    t.priority_uuid AS priority_uuid,
    t.category_uuid AS category_uuid,
    t.created_at AS created_at
FROM tasks t
LEFT JOIN priorities p ON p.uuid = t.priority_uuid";

/// Recognized sort keys for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskSort {
    TitleAsc,
    TitleDesc,
    CreatedAsc,
    CreatedDesc,
    PriorityAsc,
    PriorityDesc,
}

impl TaskSort {
    /// Unknown or absent keys fall back to newest-first.
    fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("title_asc") => Self::TitleAsc,
            Some("title_desc") => Self::TitleDesc,
            Some("created_asc") => Self::CreatedAsc,
            Some("priority_asc") => Self::PriorityAsc,
            Some("priority_desc") => Self::PriorityDesc,
            _ => Self::CreatedDesc,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::TitleAsc => "t.title ASC, t.uuid ASC",
            Self::TitleDesc => "t.title DESC, t.uuid ASC",
            Self::CreatedAsc => "t.created_at ASC, t.uuid ASC",
            Self::CreatedDesc => "t.created_at DESC, t.uuid ASC",
            Self::PriorityAsc => "p.name ASC, t.uuid ASC",
            Self::PriorityDesc => "p.name DESC, t.uuid ASC",
        }
    }
}

/// Data access contract for tasks.
pub trait TaskRepository {
    /// Validates the draft and inserts a new task.
    fn create_task(&self, draft: &TaskDraft) -> RepoResult<Task>;

    /// Validates the draft and overwrites every mutable field of the task.
    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> RepoResult<Task>;

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;

    /// Lists tasks matching the query, one fixed-size page at a time.
    fn list_tasks(&self, query: &ListQuery) -> RepoResult<Page<Task>>;

    /// Deletes the task and everything attached to it.
    fn delete_task(&mut self, id: TaskId) -> RepoResult<()>;
}

pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection after verifying the task schema is present.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        expect_migrated_connection(conn)?;
        expect_table(
            conn,
            "tasks",
            &[
                "uuid",
                "title",
                "description",
                "status",
                "deadline",
                "priority_uuid",
                "category_uuid",
                "created_at",
            ],
        )?;
        expect_table(conn, "categories", &["uuid", "name"])?;
        expect_table(conn, "priorities", &["uuid", "name"])?;
        Ok(Self { conn })
    }

    fn validate_draft(&self, draft: &TaskDraft) -> RepoResult<()> {
        let mut fields = draft.field_errors();
        if let Some(id) = draft.category_uuid {
            if !row_exists(self.conn, "categories", id)? {
                fields.push(FieldError::unknown_reference("category", id));
            }
        }
        if let Some(id) = draft.priority_uuid {
            if !row_exists(self.conn, "priorities", id)? {
                fields.push(FieldError::unknown_reference("priority", id));
            }
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::model::ValidationError::new(fields).into())
        }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        self.validate_draft(draft)?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (uuid, title, description, status, deadline, priority_uuid, category_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id.to_string(),
                draft.title.trim(),
                draft.description,
                draft.status.as_str(),
                draft.deadline,
                draft.priority_uuid.map(|value| value.to_string()),
                draft.category_uuid.map(|value| value.to_string()),
            ],
        )?;
        load_required_task(self.conn, id)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> RepoResult<Task> {
        // Missing target beats draft problems, so probe existence first.
        if !task_exists(self.conn, id)? {
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }
        self.validate_draft(draft)?;
        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, status = ?3, deadline = ?4,
                 priority_uuid = ?5, category_uuid = ?6
             WHERE uuid = ?7;",
            params![
                draft.title.trim(),
                draft.description,
                draft.status.as_str(),
                draft.deadline,
                draft.priority_uuid.map(|value| value.to_string()),
                draft.category_uuid.map(|value| value.to_string()),
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }
        load_required_task(self.conn, id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        load_task(self.conn, id)
    }

    fn list_tasks(&self, query: &ListQuery) -> RepoResult<Page<Task>> {
        let mut where_sql = String::new();
        let mut filter_binds: Vec<Value> = Vec::new();
        if let Some(q) = &query.q {
            where_sql.push_str(" WHERE t.title LIKE ? ESCAPE '\\'");
            filter_binds.push(Value::from(like_pattern(q)));
        }

        let total_items: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM tasks t{where_sql};"),
            params_from_iter(filter_binds.iter().cloned()),
            |row| row.get(0),
        )?;

        let page = query.effective_page();
        let order = TaskSort::from_param(query.sort.as_deref()).order_clause();
        let sql = format!("{TASK_SELECT_SQL}{where_sql} ORDER BY {order} LIMIT ? OFFSET ?;");
        let mut binds = filter_binds;
        binds.push(Value::from(i64::from(PAGE_SIZE)));
        binds.push(Value::from(i64::from(page - 1) * i64::from(PAGE_SIZE)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_task_row(row)?);
        }
        Ok(Page {
            items,
            page,
            page_size: PAGE_SIZE,
            total_items: total_items as u64,
        })
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM notes WHERE task_uuid = ?1;", [id.to_string()])?;
        tx.execute(
            "DELETE FROM subtasks WHERE parent_task_uuid = ?1;",
            [id.to_string()],
        )?;
        let changed = tx.execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            // Dropping the transaction rolls the child deletes back.
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn task_exists(conn: &Connection, id: TaskId) -> RepoResult<bool> {
    row_exists(conn, "tasks", id)
}

pub(crate) fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid: String = row.get("uuid")?;
    let status: String = row.get("status")?;
    let priority_uuid: Option<String> = row.get("priority_uuid")?;
    let category_uuid: Option<String> = row.get("category_uuid")?;
    Ok(Task {
        uuid: parse_uuid(&uuid, "tasks.uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: TaskStatus::parse(&status)
            .ok_or_else(|| RepoError::InvalidData(format!("unknown task status `{status}`")))?,
        deadline: row.get("deadline")?,
        priority_uuid: priority_uuid
            .map(|value| parse_uuid(&value, "tasks.priority_uuid"))
            .transpose()?,
        category_uuid: category_uuid
            .map(|value| parse_uuid(&value, "tasks.category_uuid"))
            .transpose()?,
        created_at: row.get("created_at")?,
    })
}

fn load_task(conn: &Connection, id: TaskId) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE t.uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_task_row(row)?)),
        None => Ok(None),
    }
}

fn load_required_task(conn: &Connection, id: TaskId) -> RepoResult<Task> {
    load_task(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::Task,
        id,
    })
}
