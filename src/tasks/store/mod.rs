// tasks/store/mod.rs — persistence abstraction over task records.
//
// Two backings share one observable contract: `memory` (ephemeral, lost on
// restart) and `sqlite` (durable). The service is written against the trait
// only, so the deployment picks the backing without code changes elsewhere.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use anyhow::Result;
use async_trait::async_trait;

use super::{NewTask, Task, TaskFilter};

/// Store contract. Each call is atomic from the caller's perspective — no
/// partial writes are ever observable.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Assign a fresh unique id, persist the record, and return it.
    /// Ids are never reused, even after a delete.
    async fn insert(&self, task: NewTask) -> Result<Task>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>>;

    /// All matching tasks ordered by creation time descending. Tasks sharing
    /// a creation timestamp keep their insertion order relative to each
    /// other.
    async fn find_all(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Replace the stored record with `task`. Returns `None` when the id is
    /// no longer present (e.g. a racing delete won).
    async fn update(&self, task: &Task) -> Result<Option<Task>>;

    /// Remove permanently. Returns `false` when the id was absent.
    async fn remove(&self, id: &str) -> Result<bool>;
}
