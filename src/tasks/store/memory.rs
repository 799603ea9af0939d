// tasks/store/memory.rs — ephemeral in-process store.
//
// Backed by an insertion-ordered Vec behind a tokio RwLock. State is lost on
// process restart. Ids come from a monotonically increasing counter, so an
// id is never reused within a process lifetime.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::TaskStore;
use crate::tasks::{NewTask, Task, TaskFilter};

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
    next_id: AtomicU64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: NewTask) -> Result<Task> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let record = Task {
            id: id.to_string(),
            title: task.title,
            description: task.description,
            status: task.status,
            user_id: task.user_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        };
        self.tasks.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_all(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .iter()
            .filter(|t| match &filter.user_id {
                Some(user_id) => &t.user_id == user_id,
                None => true,
            })
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                tasks.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskStatus;
    use chrono::Utc;

    fn new_task(title: &str, user_id: &str) -> NewTask {
        let now = Utc::now();
        NewTask {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids_and_never_reuses_them() {
        let store = MemoryTaskStore::new();
        let a = store.insert(new_task("a", "u1")).await.unwrap();
        let b = store.insert(new_task("b", "u1")).await.unwrap();
        assert_ne!(a.id, b.id);

        assert!(store.remove(&b.id).await.unwrap());
        let c = store.insert(new_task("c", "u1")).await.unwrap();
        assert_ne!(c.id, b.id);
    }

    #[tokio::test]
    async fn find_all_filters_by_user_and_orders_newest_first() {
        let store = MemoryTaskStore::new();
        let mut first = new_task("first", "u1");
        let mut second = new_task("second", "u1");
        let mut other = new_task("other", "u2");
        first.created_at = Utc::now() - chrono::Duration::seconds(2);
        first.updated_at = first.created_at;
        second.created_at = Utc::now();
        second.updated_at = second.created_at;
        other.created_at = Utc::now() - chrono::Duration::seconds(1);
        other.updated_at = other.created_at;
        store.insert(first).await.unwrap();
        store.insert(second).await.unwrap();
        store.insert(other).await.unwrap();

        let all = store.find_all(&TaskFilter::default()).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["second", "other", "first"]);

        let u1 = store
            .find_all(&TaskFilter {
                user_id: Some("u1".to_string()),
            })
            .await
            .unwrap();
        assert!(u1.iter().all(|t| t.user_id == "u1"));
        assert_eq!(u1.len(), 2);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let store = MemoryTaskStore::new();
        let ts = Utc::now();
        for title in ["a", "b", "c"] {
            let mut task = new_task(title, "u1");
            task.created_at = ts;
            task.updated_at = ts;
            store.insert(task).await.unwrap();
        }
        let all = store.find_all(&TaskFilter::default()).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn update_and_remove_report_missing_ids() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("a", "u1")).await.unwrap();

        let mut changed = task.clone();
        changed.title = "renamed".to_string();
        let updated = store.update(&changed).await.unwrap().unwrap();
        assert_eq!(updated.title, "renamed");

        assert!(store.remove(&task.id).await.unwrap());
        assert!(!store.remove(&task.id).await.unwrap());
        assert!(store.update(&changed).await.unwrap().is_none());
        assert!(store.find_by_id(&task.id).await.unwrap().is_none());
    }
}
