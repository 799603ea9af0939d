// tasks/service.rs — business rules for the task lifecycle.
//
// The service is the single authority for existence checks and field
// merging. It holds an injected store (constructor injection) so the
// ephemeral and durable backings are interchangeable. Errors are typed and
// converted to HTTP exactly once, at the REST boundary.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::store::TaskStore;
use super::{CreateTaskInput, NewTask, Task, TaskFilter, UpdateTaskInput};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task with ID {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// All tasks, optionally restricted to one owner, newest first.
    /// An empty result is not an error.
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError> {
        info!(user_id = ?filter.user_id, "Getting all tasks");
        Ok(self.store.find_all(&filter).await?)
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, TaskError> {
        info!(id, "Getting task");
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Create a task. The store assigns the id; both timestamps are set to
    /// the same instant; the owner defaults to the requester when the payload
    /// does not name one.
    pub async fn create_task(
        &self,
        input: CreateTaskInput,
        requester_id: &str,
    ) -> Result<Task, TaskError> {
        info!(title = %input.title, "Creating new task");
        let now = Utc::now();
        let task = NewTask {
            title: input.title,
            description: input.description,
            status: input.status,
            user_id: input.user_id.unwrap_or_else(|| requester_id.to_string()),
            created_at: now,
            updated_at: now,
        };
        Ok(self.store.insert(task).await?)
    }

    /// Merge the fields present in `input` into the stored record and bump
    /// `updated_at`. Absent fields keep their prior values; `description` is
    /// replaced only when explicitly provided.
    pub async fn update_task(
        &self,
        id: &str,
        input: UpdateTaskInput,
    ) -> Result<Task, TaskError> {
        info!(id, "Updating task");
        let mut task = self.get_task(id).await?;

        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = Some(description);
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        task.updated_at = Utc::now();

        self.store
            .update(&task)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Remove permanently. Delete is not idempotent: a second call with the
    /// same id fails with `NotFound`.
    pub async fn delete_task(&self, id: &str) -> Result<(), TaskError> {
        info!(id, "Deleting task");
        if !self.store.remove(id).await? {
            return Err(TaskError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::store::MemoryTaskStore;
    use crate::tasks::TaskStatus;
    use std::time::Duration;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn create_input(title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            description: None,
            status: TaskStatus::default(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_status_owner_and_timestamps() {
        let svc = service();
        let task = svc.create_task(create_input("Write spec"), "u1").await.unwrap();
        assert!(!task.id.is_empty());
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.user_id, "u1");
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn create_prefers_explicit_owner_over_requester() {
        let svc = service();
        let input = CreateTaskInput {
            user_id: Some("u2".to_string()),
            ..create_input("theirs")
        };
        let task = svc.create_task(input, "u1").await.unwrap();
        assert_eq!(task.user_id, "u2");
    }

    #[tokio::test]
    async fn get_returns_the_created_record() {
        let svc = service();
        let created = svc.create_task(create_input("a"), "u1").await.unwrap();
        let fetched = svc.get_task(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get_task("missing").await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn empty_update_only_bumps_updated_at() {
        let svc = service();
        let created = svc.create_task(create_input("a"), "u1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = svc
            .update_task(&created.id, UpdateTaskInput::default())
            .await
            .unwrap();
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let svc = service();
        let input = CreateTaskInput {
            description: Some("keep me".to_string()),
            ..create_input("draft")
        };
        let created = svc.create_task(input, "u1").await.unwrap();

        let updated = svc
            .update_task(
                &created.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, "draft");
        assert_eq!(updated.description.as_deref(), Some("keep me"));

        let updated = svc
            .update_task(
                &created.id,
                UpdateTaskInput {
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // Explicitly provided empty description replaces the old one.
        assert_eq!(updated.description.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.update_task("missing", UpdateTaskInput::default()).await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found_and_second_delete_fails() {
        let svc = service();
        let created = svc.create_task(create_input("a"), "u1").await.unwrap();

        svc.delete_task(&created.id).await.unwrap();
        assert!(matches!(
            svc.get_task(&created.id).await,
            Err(TaskError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_task(&created.id).await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_owner_in_descending_creation_order() {
        let svc = service();
        for title in ["first", "second"] {
            svc.create_task(create_input(title), "u1").await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        svc.create_task(create_input("theirs"), "u2").await.unwrap();

        let mine = svc
            .list_tasks(TaskFilter {
                user_id: Some("u1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.user_id == "u1"));
        assert_eq!(mine[0].title, "second");
        assert_eq!(mine[1].title, "first");

        let empty = svc
            .list_tasks(TaskFilter {
                user_id: Some("nobody".to_string()),
            })
            .await
            .unwrap();
        assert!(empty.is_empty());
    }
}
