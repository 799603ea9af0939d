// tasks/store/sqlite.rs — durable store backed by SQLite (WAL mode).
//
// One table, `tasks`, keyed by a uuid v4 string. Timestamps are persisted as
// RFC3339 strings. The schema is auto-created on startup in non-production
// environments; production deployments are expected to provision it.

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

use super::TaskStore;
use crate::tasks::{NewTask, Task, TaskFilter, TaskStatus};

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking a request indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    status: String,
    #[sqlx(rename = "userId")]
    user_id: String,
    #[sqlx(rename = "createdAt")]
    created_at: String,
    #[sqlx(rename = "updatedAt")]
    updated_at: String,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let status = TaskStatus::parse(&self.status)
            .ok_or_else(|| anyhow!("invalid status '{}' for task {}", self.status, self.id))?;
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            user_id: self.user_id,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid timestamp '{s}'"))?
        .with_timezone(&Utc))
}

#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Open (or create) `{data_dir}/taskd.db` and optionally auto-create the
    /// schema.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding
    /// it are logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new(
        data_dir: &Path,
        slow_query_ms: u64,
        auto_create_schema: bool,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskd.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        if auto_create_schema {
            Self::create_schema(&pool).await?;
        }
        Ok(Self { pool })
    }

    async fn create_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                description TEXT,
                status      TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'in-progress', 'completed')),
                userId      TEXT NOT NULL,
                createdAt   TEXT NOT NULL,
                updatedAt   TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await
        .context("Failed to create tasks table")?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn insert(&self, task: NewTask) -> Result<Task> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, userId, createdAt, updatedAt)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(&task.user_id)
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        self.find_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("task not found after insert"))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TaskRow::into_task).transpose()
    }

    async fn find_all(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        // rowid tie-break keeps insertion order for equal timestamps.
        let rows: Vec<TaskRow> = with_timeout(async {
            Ok(match &filter.user_id {
                Some(user_id) => {
                    sqlx::query_as(
                        "SELECT * FROM tasks WHERE userId = ?
                         ORDER BY createdAt DESC, rowid ASC",
                    )
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query_as("SELECT * FROM tasks ORDER BY createdAt DESC, rowid ASC")
                        .fetch_all(&self.pool)
                        .await?
                }
            })
        })
        .await?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>> {
        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, status = ?, updatedAt = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.updated_at.to_rfc3339())
        .bind(&task.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(&task.id).await
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
