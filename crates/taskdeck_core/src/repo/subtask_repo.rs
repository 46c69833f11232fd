//! SQLite persistence for subtasks.
//!
//! Subtasks always hang off a parent task; the parent reference is
//! validated on every write and surfaces as a field error, not a bare
//! constraint failure.

use crate::model::{EntityKind, FieldError, SubTask, SubTaskDraft, SubTaskId, TaskStatus};
use crate::repo::task_repo::task_exists;
use crate::repo::{
    expect_migrated_connection, expect_table, like_pattern, parse_uuid, ListQuery, Page,
    RepoError, RepoResult, PAGE_SIZE,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const SUBTASK_SELECT_SQL: &str =
    "SELECT uuid, title, status, parent_task_uuid, created_at FROM subtasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubTaskSort {
    TitleAsc,
    TitleDesc,
    CreatedAsc,
    CreatedDesc,
}

impl SubTaskSort {
    fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("title_asc") => Self::TitleAsc,
            Some("title_desc") => Self::TitleDesc,
            Some("created_asc") => Self::CreatedAsc,
            _ => Self::CreatedDesc,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::TitleAsc => "title ASC, uuid ASC",
            Self::TitleDesc => "title DESC, uuid ASC",
            Self::CreatedAsc => "created_at ASC, uuid ASC",
            Self::CreatedDesc => "created_at DESC, uuid ASC",
        }
    }
}

/// Data access contract for subtasks.
pub trait SubTaskRepository {
    fn create_subtask(&self, draft: &SubTaskDraft) -> RepoResult<SubTask>;

    fn update_subtask(&self, id: SubTaskId, draft: &SubTaskDraft) -> RepoResult<SubTask>;

    fn get_subtask(&self, id: SubTaskId) -> RepoResult<Option<SubTask>>;

    fn list_subtasks(&self, query: &ListQuery) -> RepoResult<Page<SubTask>>;

    fn delete_subtask(&self, id: SubTaskId) -> RepoResult<()>;
}

pub struct SqliteSubTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        expect_migrated_connection(conn)?;
        expect_table(
            conn,
            "subtasks",
            &["uuid", "title", "status", "parent_task_uuid", "created_at"],
        )?;
        expect_table(conn, "tasks", &["uuid"])?;
        Ok(Self { conn })
    }

    fn validate_draft(&self, draft: &SubTaskDraft) -> RepoResult<()> {
        let mut fields = draft.field_errors();
        if !task_exists(self.conn, draft.parent_task_uuid)? {
            fields.push(FieldError::unknown_reference(
                "parent_task",
                draft.parent_task_uuid,
            ));
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::model::ValidationError::new(fields).into())
        }
    }
}

impl SubTaskRepository for SqliteSubTaskRepository<'_> {
    fn create_subtask(&self, draft: &SubTaskDraft) -> RepoResult<SubTask> {
        self.validate_draft(draft)?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO subtasks (uuid, title, status, parent_task_uuid)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                draft.title.trim(),
                draft.status.as_str(),
                draft.parent_task_uuid.to_string(),
            ],
        )?;
        load_required_subtask(self.conn, id)
    }

    fn update_subtask(&self, id: SubTaskId, draft: &SubTaskDraft) -> RepoResult<SubTask> {
        if load_subtask(self.conn, id)?.is_none() {
            return Err(RepoError::NotFound {
                kind: EntityKind::SubTask,
                id,
            });
        }
        self.validate_draft(draft)?;
        self.conn.execute(
            "UPDATE subtasks
             SET title = ?1, status = ?2, parent_task_uuid = ?3
             WHERE uuid = ?4;",
            params![
                draft.title.trim(),
                draft.status.as_str(),
                draft.parent_task_uuid.to_string(),
                id.to_string(),
            ],
        )?;
        load_required_subtask(self.conn, id)
    }

    fn get_subtask(&self, id: SubTaskId) -> RepoResult<Option<SubTask>> {
        load_subtask(self.conn, id)
    }

    fn list_subtasks(&self, query: &ListQuery) -> RepoResult<Page<SubTask>> {
        let mut where_sql = String::new();
        let mut filter_binds: Vec<Value> = Vec::new();
        if let Some(q) = &query.q {
            where_sql.push_str(" WHERE title LIKE ? ESCAPE '\\'");
            filter_binds.push(Value::from(like_pattern(q)));
        }

        let total_items: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM subtasks{where_sql};"),
            params_from_iter(filter_binds.iter().cloned()),
            |row| row.get(0),
        )?;

        let page = query.effective_page();
        let order = SubTaskSort::from_param(query.sort.as_deref()).order_clause();
        let sql = format!("{SUBTASK_SELECT_SQL}{where_sql} ORDER BY {order} LIMIT ? OFFSET ?;");
        let mut binds = filter_binds;
        binds.push(Value::from(i64::from(PAGE_SIZE)));
        binds.push(Value::from(i64::from(page - 1) * i64::from(PAGE_SIZE)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_subtask_row(row)?);
        }
        Ok(Page {
            items,
            page,
            page_size: PAGE_SIZE,
            total_items: total_items as u64,
        })
    }

    fn delete_subtask(&self, id: SubTaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM subtasks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::SubTask,
                id,
            });
        }
        Ok(())
    }
}

fn parse_subtask_row(row: &Row<'_>) -> RepoResult<SubTask> {
    let uuid: String = row.get("uuid")?;
    let status: String = row.get("status")?;
    let parent: String = row.get("parent_task_uuid")?;
    Ok(SubTask {
        uuid: parse_uuid(&uuid, "subtasks.uuid")?,
        title: row.get("title")?,
        status: TaskStatus::parse(&status)
            .ok_or_else(|| RepoError::InvalidData(format!("unknown subtask status `{status}`")))?,
        parent_task_uuid: parse_uuid(&parent, "subtasks.parent_task_uuid")?,
        created_at: row.get("created_at")?,
    })
}

fn load_subtask(conn: &Connection, id: SubTaskId) -> RepoResult<Option<SubTask>> {
    let mut stmt = conn.prepare(&format!("{SUBTASK_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_subtask_row(row)?)),
        None => Ok(None),
    }
}

fn load_required_subtask(conn: &Connection, id: SubTaskId) -> RepoResult<SubTask> {
    load_subtask(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::SubTask,
        id,
    })
}
