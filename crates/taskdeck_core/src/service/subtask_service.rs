//! Subtask operations behind the access gate.

use crate::auth::AuthorizedSession;
use crate::model::{EntityKind, SubTask, SubTaskDraft, SubTaskId};
use crate::repo::subtask_repo::SubTaskRepository;
use crate::repo::{ListQuery, Page, RepoError, RepoResult};

pub struct SubTaskService<R: SubTaskRepository> {
    repo: R,
}

impl<R: SubTaskRepository> SubTaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_subtask(
        &self,
        _session: &AuthorizedSession,
        draft: &SubTaskDraft,
    ) -> RepoResult<SubTask> {
        self.repo.create_subtask(draft)
    }

    pub fn update_subtask(
        &self,
        _session: &AuthorizedSession,
        id: SubTaskId,
        draft: &SubTaskDraft,
    ) -> RepoResult<SubTask> {
        self.repo.update_subtask(id, draft)
    }

    pub fn get_subtask(&self, _session: &AuthorizedSession, id: SubTaskId) -> RepoResult<SubTask> {
        self.repo.get_subtask(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::SubTask,
            id,
        })
    }

    pub fn list_subtasks(
        &self,
        _session: &AuthorizedSession,
        query: &ListQuery,
    ) -> RepoResult<Page<SubTask>> {
        self.repo.list_subtasks(query)
    }

    pub fn delete_subtask(&self, _session: &AuthorizedSession, id: SubTaskId) -> RepoResult<()> {
        self.repo.delete_subtask(id)
    }
}
