//! Dashboard read model behind the access gate.

use crate::auth::AuthorizedSession;
use crate::repo::summary::{load_dashboard_summary, DashboardSummary};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Loads entity counts plus the most recent tasks and notes.
pub fn dashboard_summary(
    conn: &Connection,
    _session: &AuthorizedSession,
) -> RepoResult<DashboardSummary> {
    load_dashboard_summary(conn)
}
