//! SQLite persistence for categories and priorities.
//!
//! Both label tables share one shape, so a single repository serves them
//! and callers pick the side with [`LabelKind`].
//!
//! # Invariants
//! - Deleting a label first clears the matching reference column on
//!   tasks, inside one transaction.
//! - Name ordering uses SQLite's default collation plus a `uuid ASC`
//!   tiebreak.

use crate::model::{Label, LabelDraft, LabelId, LabelKind, ValidationError};
use crate::repo::{
    expect_migrated_connection, expect_table, like_pattern, parse_uuid, ListQuery, Page,
    RepoError, RepoResult, PAGE_SIZE,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelSort {
    NameAsc,
    NameDesc,
    CreatedAsc,
    CreatedDesc,
}

impl LabelSort {
    fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("name_asc") => Self::NameAsc,
            Some("name_desc") => Self::NameDesc,
            Some("created_asc") => Self::CreatedAsc,
            _ => Self::CreatedDesc,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::NameAsc => "name ASC, uuid ASC",
            Self::NameDesc => "name DESC, uuid ASC",
            Self::CreatedAsc => "created_at ASC, uuid ASC",
            Self::CreatedDesc => "created_at DESC, uuid ASC",
        }
    }
}

/// Data access contract for both label kinds.
pub trait LabelRepository {
    fn create_label(&self, kind: LabelKind, draft: &LabelDraft) -> RepoResult<Label>;

    fn update_label(&self, kind: LabelKind, id: LabelId, draft: &LabelDraft) -> RepoResult<Label>;

    fn get_label(&self, kind: LabelKind, id: LabelId) -> RepoResult<Option<Label>>;

    /// Exact-name lookup; the oldest label wins when names repeat.
    fn find_label_by_name(&self, kind: LabelKind, name: &str) -> RepoResult<Option<Label>>;

    fn list_labels(&self, kind: LabelKind, query: &ListQuery) -> RepoResult<Page<Label>>;

    /// Deletes the label and detaches it from every task pointing at it.
    fn delete_label(&mut self, kind: LabelKind, id: LabelId) -> RepoResult<()>;
}

pub struct SqliteLabelRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteLabelRepository<'conn> {
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        expect_migrated_connection(conn)?;
        expect_table(conn, "categories", &["uuid", "name", "created_at"])?;
        expect_table(conn, "priorities", &["uuid", "name", "created_at"])?;
        expect_table(conn, "tasks", &["uuid", "priority_uuid", "category_uuid"])?;
        Ok(Self { conn })
    }
}

impl LabelRepository for SqliteLabelRepository<'_> {
    fn create_label(&self, kind: LabelKind, draft: &LabelDraft) -> RepoResult<Label> {
        let fields = draft.field_errors();
        if !fields.is_empty() {
            return Err(ValidationError::new(fields).into());
        }
        let id = Uuid::new_v4();
        self.conn.execute(
            &format!("INSERT INTO {} (uuid, name) VALUES (?1, ?2);", kind.table()),
            params![id.to_string(), draft.name.trim()],
        )?;
        load_required_label(self.conn, kind, id)
    }

    fn update_label(&self, kind: LabelKind, id: LabelId, draft: &LabelDraft) -> RepoResult<Label> {
        if load_label(self.conn, kind, id)?.is_none() {
            return Err(RepoError::NotFound {
                kind: kind.entity_kind(),
                id,
            });
        }
        let fields = draft.field_errors();
        if !fields.is_empty() {
            return Err(ValidationError::new(fields).into());
        }
        self.conn.execute(
            &format!("UPDATE {} SET name = ?1 WHERE uuid = ?2;", kind.table()),
            params![draft.name.trim(), id.to_string()],
        )?;
        load_required_label(self.conn, kind, id)
    }

    fn get_label(&self, kind: LabelKind, id: LabelId) -> RepoResult<Option<Label>> {
        load_label(self.conn, kind, id)
    }

    fn find_label_by_name(&self, kind: LabelKind, name: &str) -> RepoResult<Option<Label>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT uuid, name, created_at FROM {}
             WHERE name = ?1
             ORDER BY created_at ASC, uuid ASC
             LIMIT 1;",
            kind.table()
        ))?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_label_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_labels(&self, kind: LabelKind, query: &ListQuery) -> RepoResult<Page<Label>> {
        let mut where_sql = String::new();
        let mut filter_binds: Vec<Value> = Vec::new();
        if let Some(q) = &query.q {
            where_sql.push_str(" WHERE name LIKE ? ESCAPE '\\'");
            filter_binds.push(Value::from(like_pattern(q)));
        }

        let total_items: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}{where_sql};", kind.table()),
            params_from_iter(filter_binds.iter().cloned()),
            |row| row.get(0),
        )?;

        let page = query.effective_page();
        let order = LabelSort::from_param(query.sort.as_deref()).order_clause();
        let sql = format!(
            "SELECT uuid, name, created_at FROM {}{where_sql} ORDER BY {order} LIMIT ? OFFSET ?;",
            kind.table()
        );
        let mut binds = filter_binds;
        binds.push(Value::from(i64::from(PAGE_SIZE)));
        binds.push(Value::from(i64::from(page - 1) * i64::from(PAGE_SIZE)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_label_row(row)?);
        }
        Ok(Page {
            items,
            page,
            page_size: PAGE_SIZE,
            total_items: total_items as u64,
        })
    }

    fn delete_label(&mut self, kind: LabelKind, id: LabelId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let column = kind.task_column();
        tx.execute(
            &format!("UPDATE tasks SET {column} = NULL WHERE {column} = ?1;"),
            [id.to_string()],
        )?;
        let changed = tx.execute(
            &format!("DELETE FROM {} WHERE uuid = ?1;", kind.table()),
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: kind.entity_kind(),
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_label_row(row: &Row<'_>) -> RepoResult<Label> {
    let uuid: String = row.get("uuid")?;
    Ok(Label {
        uuid: parse_uuid(&uuid, "uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

fn load_label(conn: &Connection, kind: LabelKind, id: LabelId) -> RepoResult<Option<Label>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT uuid, name, created_at FROM {} WHERE uuid = ?1;",
        kind.table()
    ))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_label_row(row)?)),
        None => Ok(None),
    }
}

fn load_required_label(conn: &Connection, kind: LabelKind, id: LabelId) -> RepoResult<Label> {
    load_label(conn, kind, id)?.ok_or(RepoError::NotFound {
        kind: kind.entity_kind(),
        id,
    })
}
