//! Thread-safe in-memory implementation of the task repository port.
//!
//! The default store for embedded deployments and the reference
//! implementation of the port contract exercised by the service tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId, TaskPatch},
    ports::{TaskFilter, TaskOrdering, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sorts query results according to the requested contract ordering.
///
/// Ties break on `created_at` (then ID formatting) so repeated queries
/// return a stable order.
fn sort_tasks(tasks: &mut [Task], order: TaskOrdering) {
    match order {
        TaskOrdering::CreatedAtDesc => {
            tasks.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then_with(|| a.id().to_string().cmp(&b.id().to_string()))
            });
        }
        TaskOrdering::DeadlineAsc => {
            tasks.sort_by(|a, b| {
                a.actual_deadline()
                    .cmp(&b.actual_deadline())
                    .then_with(|| a.created_at().cmp(&b.created_at()))
            });
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }

    async fn find(
        &self,
        filter: &TaskFilter,
        order: TaskOrdering,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        sort_tasks(&mut tasks, order);
        Ok(tasks)
    }

    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        match state.get_mut(&id) {
            Some(task) => {
                task.apply_patch(patch, updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.remove(&id).is_some())
    }

    async fn count(&self, filter: &TaskFilter) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let matching = state.values().filter(|task| filter.matches(task)).count();
        Ok(matching as u64)
    }
}
