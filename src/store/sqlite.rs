//! SQLite-based task store.
//!
//! Admission control runs inside a `BEGIN IMMEDIATE` transaction: the write
//! lock is taken up front, so the exists/count/insert sequence serializes
//! against every other admission attempt, including ones from other
//! processes sharing the database file.

use super::{StoreError, Submission, Task, TaskStore, STATUS_OPEN};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Open'
);

CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id INTEGER NOT NULL,
    submitter_name TEXT NOT NULL,
    content TEXT NOT NULL,
    FOREIGN KEY (task_id) REFERENCES tasks(id)
);

CREATE INDEX IF NOT EXISTS idx_submissions_task ON submissions(task_id);
"#;

pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
    max_submissions: usize,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `db_path` and bootstrap the schema.
    /// The schema batch is idempotent, so reopening an existing database is
    /// safe.
    pub async fn new(db_path: PathBuf, max_submissions: usize) -> Result<Self, StoreError> {
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            conn.execute_batch(SCHEMA)?;
            Ok::<_, StoreError>(conn)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            max_submissions,
        })
    }
}

fn task_from_row(row: &rusqlite::Row<'_>) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let mut stmt =
                conn.prepare("SELECT id, title, description, status FROM tasks")?;
            let tasks = stmt
                .query_map([], task_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tasks)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))?
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let task = conn
                .query_row(
                    "SELECT id, title, description, status FROM tasks WHERE id = ?1",
                    params![id],
                    task_from_row,
                )
                .optional()?;
            Ok(task)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))?
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task, StoreError> {
        let conn = self.conn.clone();
        let title = title.to_string();
        let description = description.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO tasks (title, description, status) VALUES (?1, ?2, ?3)",
                params![title, description, STATUS_OPEN],
            )?;
            let id = conn.last_insert_rowid();
            Ok(Task {
                id,
                title,
                description,
                status: STATUS_OPEN.to_string(),
            })
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))?
    }

    async fn create_submission(
        &self,
        task_id: i64,
        submitter_name: &str,
        content: &str,
    ) -> Result<Submission, StoreError> {
        let conn = self.conn.clone();
        let max = self.max_submissions;
        let submitter_name = submitter_name.to_string();
        let content = content.to_string();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let task_exists = tx
                .prepare("SELECT 1 FROM tasks WHERE id = ?1")?
                .exists(params![task_id])?;
            if !task_exists {
                // tx dropped here, transaction rolls back
                return Err(StoreError::TaskNotFound(task_id));
            }

            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM submissions WHERE task_id = ?1",
                params![task_id],
                |row| row.get(0),
            )?;
            if count >= max as i64 {
                return Err(StoreError::QuotaFull(task_id));
            }

            tx.execute(
                "INSERT INTO submissions (task_id, submitter_name, content) VALUES (?1, ?2, ?3)",
                params![task_id, submitter_name, content],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(Submission {
                id,
                task_id,
                submitter_name,
                content,
            })
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))?
    }

    async fn count_submissions(&self, task_id: i64) -> Result<usize, StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM submissions WHERE task_id = ?1",
                params![task_id],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))?
    }
}
