//! Note operations behind the access gate.
//!
//! # Responsibility
//! - Derive the stored preview line from note content on every write so
//!   listings never re-parse markup.
//!
//! # Invariants
//! - The preview is plain text: markup stripped, whitespace collapsed,
//!   cut at [`PREVIEW_MAX_CHARS`] characters.

use crate::auth::AuthorizedSession;
use crate::model::{EntityKind, Note, NoteDraft, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::{ListQuery, Page, RepoError, RepoResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on preview length, in characters.
pub const PREVIEW_MAX_CHARS: usize = 80;

static IMAGE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image markup regex"));
static LINK_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid link markup regex"));
static SYMBOL_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_`#>~\[\]()!-]+").expect("valid symbol run regex"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace run regex"));

pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_note(
        &self,
        _session: &AuthorizedSession,
        draft: &NoteDraft,
    ) -> RepoResult<Note> {
        let preview = derive_note_preview(&draft.content);
        self.repo.create_note(draft, preview.as_deref())
    }

    pub fn update_note(
        &self,
        _session: &AuthorizedSession,
        id: NoteId,
        draft: &NoteDraft,
    ) -> RepoResult<Note> {
        let preview = derive_note_preview(&draft.content);
        self.repo.update_note(id, draft, preview.as_deref())
    }

    pub fn get_note(&self, _session: &AuthorizedSession, id: NoteId) -> RepoResult<Note> {
        self.repo.get_note(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Note,
            id,
        })
    }

    pub fn list_notes(
        &self,
        _session: &AuthorizedSession,
        query: &ListQuery,
    ) -> RepoResult<Page<Note>> {
        self.repo.list_notes(query)
    }

    pub fn delete_note(&self, _session: &AuthorizedSession, id: NoteId) -> RepoResult<()> {
        self.repo.delete_note(id)
    }
}

/// Returns the first line of content that still reads as text once
/// markup is stripped, or `None` when nothing does.
pub fn derive_note_preview(content: &str) -> Option<String> {
    for line in content.lines() {
        let without_images = IMAGE_MARKUP.replace_all(line, " ");
        let without_links = LINK_MARKUP.replace_all(&without_images, "$1");
        let without_symbols = SYMBOL_RUNS.replace_all(&without_links, " ");
        let collapsed = WHITESPACE_RUNS.replace_all(&without_symbols, " ");
        let cleaned = collapsed.trim();
        if !cleaned.is_empty() {
            return Some(cleaned.chars().take(PREVIEW_MAX_CHARS).collect());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{derive_note_preview, PREVIEW_MAX_CHARS};

    #[test]
    fn plain_first_line_becomes_the_preview() {
        assert_eq!(
            derive_note_preview("Call the vendor\nsecond line"),
            Some("Call the vendor".to_string())
        );
    }

    #[test]
    fn heading_and_emphasis_markup_is_stripped() {
        assert_eq!(
            derive_note_preview("## **Ship** _it_ today"),
            Some("Ship it today".to_string())
        );
    }

    #[test]
    fn link_labels_survive_but_targets_do_not() {
        assert_eq!(
            derive_note_preview("See [the runbook](https://example.com/runbook) first"),
            Some("See the runbook first".to_string())
        );
    }

    #[test]
    fn image_only_lines_are_skipped() {
        assert_eq!(
            derive_note_preview("![diagram](scan.png)\nActual summary"),
            Some("Actual summary".to_string())
        );
    }

    #[test]
    fn whitespace_only_content_has_no_preview() {
        assert_eq!(derive_note_preview("   \n\t\n"), None);
        assert_eq!(derive_note_preview("---\n***"), None);
    }

    #[test]
    fn long_lines_are_cut_at_the_character_limit() {
        let line = "x".repeat(PREVIEW_MAX_CHARS + 40);
        let preview = derive_note_preview(&line).unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
    }
}
