//! Task operations behind the access gate.

use crate::auth::AuthorizedSession;
use crate::model::{EntityKind, Task, TaskDraft, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{ListQuery, Page, RepoError, RepoResult};

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(
        &self,
        _session: &AuthorizedSession,
        draft: &TaskDraft,
    ) -> RepoResult<Task> {
        self.repo.create_task(draft)
    }

    pub fn update_task(
        &self,
        _session: &AuthorizedSession,
        id: TaskId,
        draft: &TaskDraft,
    ) -> RepoResult<Task> {
        self.repo.update_task(id, draft)
    }

    pub fn get_task(&self, _session: &AuthorizedSession, id: TaskId) -> RepoResult<Task> {
        self.repo.get_task(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Task,
            id,
        })
    }

    pub fn list_tasks(
        &self,
        _session: &AuthorizedSession,
        query: &ListQuery,
    ) -> RepoResult<Page<Task>> {
        self.repo.list_tasks(query)
    }

    pub fn delete_task(&mut self, _session: &AuthorizedSession, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(id)
    }
}
