//! Coarse entry points for callers outside the task context.

use mockable::Clock;
use std::sync::Arc;

use crate::config::ReminderConfig;
use crate::scheduler::ports::ReminderScheduler;
use crate::task::domain::{ActionItem, MeetingId, Task, TaskId, TranscriptId};
use crate::task::ports::{TaskFilter, TaskRepository};
use crate::task::services::lifecycle::{
    TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
use crate::task::services::statistics::{TaskStatistics, TaskStatisticsService};

/// The task context's public surface.
///
/// Status moves and deletion report "did that task exist" as a boolean
/// rather than an error, which is what ingestion pipelines and interactive
/// callers both want.
pub struct TaskFacade<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    lifecycle: TaskLifecycleService<R, C>,
    statistics: TaskStatisticsService<R, C>,
}

impl<R, C> Clone for TaskFacade<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            statistics: self.statistics.clone(),
        }
    }
}

impl<R, C> TaskFacade<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Wires up the full task context over a store and a scheduler.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        scheduler: Arc<dyn ReminderScheduler>,
        reminder_config: ReminderConfig,
    ) -> Self {
        let horizon = reminder_config.upcoming_horizon_days;
        let lifecycle = TaskLifecycleService::new(repository, clock, scheduler, reminder_config);
        let statistics = TaskStatisticsService::new(lifecycle.clone(), horizon);
        Self {
            lifecycle,
            statistics,
        }
    }

    /// The underlying lifecycle service, for callers needing finer control.
    #[must_use]
    pub const fn lifecycle(&self) -> &TaskLifecycleService<R, C> {
        &self.lifecycle
    }

    /// Turns extracted action items into stored tasks with reminders.
    ///
    /// Malformed items are skipped, so the returned ids may be fewer than
    /// the items given.
    pub async fn create_tasks_from_action_items(
        &self,
        items: &[ActionItem],
        meeting_id: Option<MeetingId>,
        transcript_id: Option<TranscriptId>,
    ) -> Vec<TaskId> {
        self.lifecycle
            .create_batch(items, meeting_id, transcript_id)
            .await
    }

    /// Lists tasks matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn get_tasks(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        self.lifecycle.query(filter).await
    }

    /// Fetches a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        self.lifecycle.get(task_id).await
    }

    /// Takes a statistics snapshot of the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when any store read fails.
    pub async fn get_task_statistics(&self) -> TaskLifecycleResult<TaskStatistics> {
        self.statistics.statistics().await
    }

    /// Marks a task in progress. Returns `false` when no such task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store write fails.
    pub async fn mark_task_in_progress(&self, task_id: TaskId) -> TaskLifecycleResult<bool> {
        Self::found(self.lifecycle.mark_in_progress(task_id).await)
    }

    /// Marks a task completed. Returns `false` when no such task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store write fails.
    pub async fn mark_task_completed(&self, task_id: TaskId) -> TaskLifecycleResult<bool> {
        Self::found(self.lifecycle.mark_completed(task_id).await)
    }

    /// Deletes a task and its reminders. Returns `false` when no such
    /// task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store write fails.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<bool> {
        Self::found(self.lifecycle.delete(task_id).await)
    }

    fn found(outcome: Result<(), TaskLifecycleError>) -> TaskLifecycleResult<bool> {
        match outcome {
            Ok(()) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }
}
