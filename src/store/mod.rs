//! Task storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database (default)
//!
//! Both backends enforce the same admission rule: a task accepts at most
//! `max_submissions` submissions, checked and inserted inside a single
//! exclusive critical section so concurrent attempts cannot overshoot.

mod memory;
mod sqlite;

pub use memory::MemTaskStore;
pub use sqlite::SqliteTaskStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status assigned to every newly created task. No exposed operation
/// transitions a task away from this yet.
pub const STATUS_OPEN: &str = "Open";

/// A unit of work that accepts a bounded number of submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
}

/// A per-task response record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub task_id: i64,
    pub submitter_name: String,
    pub content: String,
}

/// Storage errors, split by how the HTTP layer must answer them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    TaskNotFound(i64),

    #[error("task {0} already has the maximum number of submissions")]
    QuotaFull(i64),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Task store trait - implemented by all storage backends.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// List all tasks in storage order.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Get a single task by ID.
    async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError>;

    /// Create a new task with status [`STATUS_OPEN`]. Empty strings are
    /// accepted for both fields.
    async fn create_task(&self, title: &str, description: &str) -> Result<Task, StoreError>;

    /// Admit a new submission for a task.
    ///
    /// The existence check, submission count, and insert run as one
    /// indivisible unit with respect to other admission attempts. Fails with
    /// [`StoreError::TaskNotFound`] if the task does not exist and
    /// [`StoreError::QuotaFull`] once the task holds the maximum number of
    /// submissions; neither failure leaves a partial write.
    async fn create_submission(
        &self,
        task_id: i64,
        submitter_name: &str,
        content: &str,
    ) -> Result<Submission, StoreError>;

    /// Count the submissions recorded for a task.
    async fn count_submissions(&self, task_id: i64) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_created_task_starts_open() {
        let store = MemTaskStore::new(3);

        let task = store
            .create_task("Write docs", "cover the admission path")
            .await
            .expect("Failed to create task");

        assert_eq!(task.status, STATUS_OPEN);
        assert_eq!(task.title, "Write docs");

        let fetched = store
            .get_task(task.id)
            .await
            .expect("Failed to get task")
            .expect("Task not found");
        assert_eq!(fetched.id, task.id);
    }

    #[tokio::test]
    async fn test_empty_strings_accepted() {
        let store = MemTaskStore::new(3);

        let task = store.create_task("", "").await.expect("Failed to create task");
        assert_eq!(task.title, "");
        assert_eq!(task.description, "");
        assert_eq!(task.status, STATUS_OPEN);
    }

    #[tokio::test]
    async fn test_get_missing_task_returns_none() {
        let store = MemTaskStore::new(3);

        let result = store.get_task(999).await.expect("Failed to query task");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_submissions_below_quota_increment_count() {
        let store = MemTaskStore::new(3);
        let task = store.create_task("T1", "d").await.unwrap();

        for expected in 1..=3usize {
            let submission = store
                .create_submission(task.id, "alice", "work")
                .await
                .expect("Submission below quota should succeed");
            assert_eq!(submission.task_id, task.id);
            assert_eq!(submission.id, expected as i64);

            let count = store.count_submissions(task.id).await.unwrap();
            assert_eq!(count, expected);
        }
    }

    #[tokio::test]
    async fn test_submission_past_quota_rejected() {
        let store = MemTaskStore::new(3);
        let task = store.create_task("T1", "d").await.unwrap();

        for _ in 0..3 {
            store.create_submission(task.id, "alice", "work").await.unwrap();
        }

        let err = store
            .create_submission(task.id, "bob", "late")
            .await
            .expect_err("Fourth submission must be rejected");
        assert!(matches!(err, StoreError::QuotaFull(id) if id == task.id));

        // Rejection must not have written anything.
        let count = store.count_submissions(task.id).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_submission_for_missing_task_rejected() {
        let store = MemTaskStore::new(3);

        let err = store
            .create_submission(42, "alice", "work")
            .await
            .expect_err("Submission for missing task must fail");
        assert!(matches!(err, StoreError::TaskNotFound(42)));

        let count = store.count_submissions(42).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_quota_is_per_task() {
        let store = MemTaskStore::new(3);
        let t1 = store.create_task("T1", "d").await.unwrap();
        let t2 = store.create_task("T2", "d").await.unwrap();

        for _ in 0..3 {
            store.create_submission(t1.id, "alice", "work").await.unwrap();
        }

        // A full quota on t1 must not affect t2.
        store
            .create_submission(t2.id, "bob", "work")
            .await
            .expect("Submission to a fresh task should succeed");
        assert_eq!(store.count_submissions(t2.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_never_overshoot_quota() {
        let store = Arc::new(MemTaskStore::new(3));
        let task = store.create_task("hot task", "d").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let task_id = task.id;
            handles.push(tokio::spawn(async move {
                store
                    .create_submission(task_id, &format!("submitter-{}", i), "work")
                    .await
            }));
        }

        let mut admitted = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.expect("submission task panicked") {
                Ok(_) => admitted += 1,
                Err(StoreError::QuotaFull(_)) => rejected += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(admitted, 3, "exactly the quota must be admitted");
        assert_eq!(rejected, 13);
        assert_eq!(store.count_submissions(task.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_tasks_returns_all() {
        let store = MemTaskStore::new(3);
        store.create_task("a", "1").await.unwrap();
        store.create_task("b", "2").await.unwrap();

        let tasks = store.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
    }
}
