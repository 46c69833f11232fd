//! SQLite persistence for notes.
//!
//! The repository stores content verbatim plus a caller-supplied preview
//! line. Title ordering and the dashboard read the stored preview, so
//! callers must keep it in sync with the content they write.

use crate::model::{EntityKind, FieldError, Note, NoteDraft, NoteId};
use crate::repo::task_repo::task_exists;
use crate::repo::{
    expect_migrated_connection, expect_table, like_pattern, parse_uuid, ListQuery, Page,
    RepoError, RepoResult, PAGE_SIZE,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

pub(crate) const NOTE_SELECT_SQL: &str =
    "SELECT uuid, task_uuid, content, preview, created_at FROM notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteSort {
    TitleAsc,
    TitleDesc,
    CreatedAsc,
    CreatedDesc,
}

impl NoteSort {
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
            // Notes have no title column; the preview line stands in.
            Self::TitleAsc => "preview ASC, uuid ASC",
            Self::TitleDesc => "preview DESC, uuid ASC",
            Self::CreatedAsc => "created_at ASC, uuid ASC",
            Self::CreatedDesc => "created_at DESC, uuid ASC",
        }
    }
}

/// Data access contract for notes.
pub trait NoteRepository {
    fn create_note(&self, draft: &NoteDraft, preview: Option<&str>) -> RepoResult<Note>;

    fn update_note(&self, id: NoteId, draft: &NoteDraft, preview: Option<&str>)
        -> RepoResult<Note>;

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;

    /// Lists notes; the free-text filter matches content or preview.
    fn list_notes(&self, query: &ListQuery) -> RepoResult<Page<Note>>;

    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        expect_migrated_connection(conn)?;
        expect_table(
            conn,
            "notes",
            &["uuid", "task_uuid", "content", "preview", "created_at"],
        )?;
        expect_table(conn, "tasks", &["uuid"])?;
        Ok(Self { conn })
    }

    fn validate_draft(&self, draft: &NoteDraft) -> RepoResult<()> {
        let mut fields = draft.field_errors();
        if !task_exists(self.conn, draft.task_uuid)? {
            fields.push(FieldError::unknown_reference("task", draft.task_uuid));
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::model::ValidationError::new(fields).into())
        }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, draft: &NoteDraft, preview: Option<&str>) -> RepoResult<Note> {
        self.validate_draft(draft)?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO notes (uuid, task_uuid, content, preview)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                draft.task_uuid.to_string(),
                draft.content,
                preview,
            ],
        )?;
        load_required_note(self.conn, id)
    }

    fn update_note(
        &self,
        id: NoteId,
        draft: &NoteDraft,
        preview: Option<&str>,
    ) -> RepoResult<Note> {
        if load_note(self.conn, id)?.is_none() {
            return Err(RepoError::NotFound {
                kind: EntityKind::Note,
                id,
            });
        }
        self.validate_draft(draft)?;
        self.conn.execute(
            "UPDATE notes
             SET task_uuid = ?1, content = ?2, preview = ?3
             WHERE uuid = ?4;",
            params![
                draft.task_uuid.to_string(),
                draft.content,
                preview,
                id.to_string(),
            ],
        )?;
        load_required_note(self.conn, id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        load_note(self.conn, id)
    }

    fn list_notes(&self, query: &ListQuery) -> RepoResult<Page<Note>> {
        let mut where_sql = String::new();
        let mut filter_binds: Vec<Value> = Vec::new();
        if let Some(q) = &query.q {
            // The preview is the note's stand-in title, so it joins the
            // match the same way a real title column would.
            where_sql
                .push_str(" WHERE (content LIKE ? ESCAPE '\\' OR preview LIKE ? ESCAPE '\\')");
            let pattern = like_pattern(q);
            filter_binds.push(Value::from(pattern.clone()));
            filter_binds.push(Value::from(pattern));
        }

        let total_items: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM notes{where_sql};"),
            params_from_iter(filter_binds.iter().cloned()),
            |row| row.get(0),
        )?;

        let page = query.effective_page();
        let order = NoteSort::from_param(query.sort.as_deref()).order_clause();
        let sql = format!("{NOTE_SELECT_SQL}{where_sql} ORDER BY {order} LIMIT ? OFFSET ?;");
        let mut binds = filter_binds;
        binds.push(Value::from(i64::from(PAGE_SIZE)));
        binds.push(Value::from(i64::from(page - 1) * i64::from(PAGE_SIZE)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_note_row(row)?);
        }
        Ok(Page {
            items,
            page,
            page_size: PAGE_SIZE,
            total_items: total_items as u64,
        })
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Note,
                id,
            });
        }
        Ok(())
    }
}

pub(crate) fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid: String = row.get("uuid")?;
    let task_uuid: String = row.get("task_uuid")?;
    Ok(Note {
        uuid: parse_uuid(&uuid, "notes.uuid")?,
        task_uuid: parse_uuid(&task_uuid, "notes.task_uuid")?,
        content: row.get("content")?,
        preview: row.get("preview")?,
        created_at: row.get("created_at")?,
    })
}

fn load_note(conn: &Connection, id: NoteId) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_note_row(row)?)),
        None => Ok(None),
    }
}

fn load_required_note(conn: &Connection, id: NoteId) -> RepoResult<Note> {
    load_note(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::Note,
        id,
    })
}
