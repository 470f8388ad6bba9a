//! In-memory task store (non-persistent).

use super::{StoreError, Submission, Task, TaskStore, STATUS_OPEN};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    submissions: Vec<Submission>,
    next_task_id: i64,
    next_submission_id: i64,
}

/// In-memory twin of the SQLite store. All state sits behind a single
/// mutex, so the admission sequence (exists, count, insert) is naturally
/// indivisible here.
#[derive(Clone)]
pub struct MemTaskStore {
    inner: Arc<Mutex<Inner>>,
    max_submissions: usize,
}

impl MemTaskStore {
    pub fn new(max_submissions: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            max_submissions,
        }
    }
}

#[async_trait]
impl TaskStore for MemTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.inner.lock().await.tasks.clone())
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_task_id += 1;
        let task = Task {
            id: inner.next_task_id,
            title: title.to_string(),
            description: description.to_string(),
            status: STATUS_OPEN.to_string(),
        };
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn create_submission(
        &self,
        task_id: i64,
        submitter_name: &str,
        content: &str,
    ) -> Result<Submission, StoreError> {
        let mut inner = self.inner.lock().await;

        if !inner.tasks.iter().any(|t| t.id == task_id) {
            return Err(StoreError::TaskNotFound(task_id));
        }

        let count = inner
            .submissions
            .iter()
            .filter(|s| s.task_id == task_id)
            .count();
        if count >= self.max_submissions {
            return Err(StoreError::QuotaFull(task_id));
        }

        inner.next_submission_id += 1;
        let submission = Submission {
            id: inner.next_submission_id,
            task_id,
            submitter_name: submitter_name.to_string(),
            content: content.to_string(),
        };
        inner.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn count_submissions(&self, task_id: i64) -> Result<usize, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .submissions
            .iter()
            .filter(|s| s.task_id == task_id)
            .count())
    }
}
