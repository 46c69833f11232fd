//! Category and priority operations behind the access gate.

use crate::auth::AuthorizedSession;
use crate::model::{Label, LabelDraft, LabelId, LabelKind};
use crate::repo::label_repo::LabelRepository;
use crate::repo::{ListQuery, Page, RepoError, RepoResult};

pub struct LabelService<R: LabelRepository> {
    repo: R,
}

impl<R: LabelRepository> LabelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_label(
        &self,
        _session: &AuthorizedSession,
        kind: LabelKind,
        draft: &LabelDraft,
    ) -> RepoResult<Label> {
        self.repo.create_label(kind, draft)
    }

    pub fn update_label(
        &self,
        _session: &AuthorizedSession,
        kind: LabelKind,
        id: LabelId,
        draft: &LabelDraft,
    ) -> RepoResult<Label> {
        self.repo.update_label(kind, id, draft)
    }

    pub fn get_label(
        &self,
        _session: &AuthorizedSession,
        kind: LabelKind,
        id: LabelId,
    ) -> RepoResult<Label> {
        self.repo.get_label(kind, id)?.ok_or(RepoError::NotFound {
            kind: kind.entity_kind(),
            id,
        })
    }

    pub fn list_labels(
        &self,
        _session: &AuthorizedSession,
        kind: LabelKind,
        query: &ListQuery,
    ) -> RepoResult<Page<Label>> {
        self.repo.list_labels(kind, query)
    }

    /// Detaches the label from its tasks and removes it.
    pub fn delete_label(
        &mut self,
        _session: &AuthorizedSession,
        kind: LabelKind,
        id: LabelId,
    ) -> RepoResult<()> {
        self.repo.delete_label(kind, id)
    }
}
