//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts and their SQLite backends.
//! - Hold the shared list-query contract: free-text filter, enumerated
//!   sort keys with newest-first fallback, fixed-size pages with totals.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Write paths collect every field problem before touching storage.
//! - Every ordering ends with `uuid ASC` so pages are stable.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::{EntityKind, ValidationError};
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod label_repo;
pub mod note_repo;
pub mod subtask_repo;
pub mod summary;
pub mod task_repo;

/// Fixed page size for every list view.
pub const PAGE_SIZE: u32 = 10;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// One or more fields failed validation; nothing was written.
    Validation(ValidationError),
    /// No record of the given kind under this id.
    NotFound { kind: EntityKind, id: Uuid },
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw list parameters as they arrive from a caller.
///
/// `sort` stays a string here; each repository parses it against its own
/// recognized key set and falls back to newest-first on anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Optional free-text filter, matched case-insensitively as substring.
    pub q: Option<String>,
    /// Optional sort key token.
    pub sort: Option<String>,
    /// 1-based page number. Zero is treated as the first page.
    pub page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: None,
            sort: None,
            page: 1,
        }
    }
}

impl ListQuery {
    /// Builds a query from optional request parameters.
    ///
    /// Blank filter text is treated as absent; a missing page means page 1.
    pub fn from_params(q: Option<String>, sort: Option<String>, page: Option<u32>) -> Self {
        let q = q.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        Self {
            q,
            sort,
            page: page.unwrap_or(1),
        }
    }

    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }
}

/// One page of list results plus the metadata pagination controls need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that produced these items.
    pub page: u32,
    pub page_size: u32,
    /// Total matching records across all pages.
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Total page count; an empty result still counts as one page.
    pub fn total_pages(&self) -> u32 {
        if self.total_items == 0 {
            return 1;
        }
        let size = u64::from(self.page_size.max(1));
        ((self.total_items + size - 1) / size) as u32
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Builds a `LIKE` pattern matching the text as a literal substring.
///
/// SQL wildcard characters in the user text are escaped; queries must pair
/// the pattern with `ESCAPE '\'`.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: Uuid) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE uuid = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Verifies the connection carries the fully migrated schema.
pub(crate) fn expect_migrated_connection(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Verifies one table and its required columns exist.
pub(crate) fn expect_table(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, ListQuery, Page};

    #[test]
    fn like_pattern_escapes_sql_wildcards() {
        assert_eq!(like_pattern("ship"), "%ship%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }

    #[test]
    fn from_params_drops_blank_filter_text() {
        let query = ListQuery::from_params(Some("   ".to_string()), None, None);
        assert_eq!(query.q, None);
        assert_eq!(query.page, 1);

        let query = ListQuery::from_params(Some("  ship  ".to_string()), None, Some(3));
        assert_eq!(query.q.as_deref(), Some("ship"));
        assert_eq!(query.page, 3);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let query = ListQuery {
            page: 0,
            ..ListQuery::default()
        };
        assert_eq!(query.effective_page(), 1);
    }

    #[test]
    fn total_pages_rounds_up_and_never_hits_zero() {
        let empty: Page<u8> = Page {
            items: Vec::new(),
            page: 1,
            page_size: 10,
            total_items: 0,
        };
        assert_eq!(empty.total_pages(), 1);
        assert!(!empty.has_next());
        assert!(!empty.has_previous());

        let partial: Page<u8> = Page {
            items: Vec::new(),
            page: 2,
            page_size: 10,
            total_items: 25,
        };
        assert_eq!(partial.total_pages(), 3);
        assert!(partial.has_next());
        assert!(partial.has_previous());
    }
}
