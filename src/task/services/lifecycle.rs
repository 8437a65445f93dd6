//! Task lifecycle orchestration: creation, status moves, and deletion,
//! with reminder bookkeeping kept in step.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ReminderConfig;
use crate::scheduler::ports::ReminderScheduler;
use crate::task::domain::{
    ActionItem, DeadlineDate, MeetingId, Task, TaskDomainError, TaskId, TaskPatch, TaskStatus,
    TranscriptId,
};
use crate::task::ports::{TaskFilter, TaskOrdering, TaskRepository, TaskRepositoryError};
use crate::task::services::reminders::ReminderPlanner;

/// Errors surfaced by lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The incoming data failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task store rejected or could not serve the operation.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Whether this error means the targeted task does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(TaskRepositoryError::NotFound(_)))
    }
}

/// Result alias for lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Coordinates the task store and the reminder planner.
///
/// Reminder registration is deliberately best-effort: a task that exists
/// without reminders beats a reminder for a task that was never stored,
/// so scheduler failures after a successful write are logged, not
/// propagated.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
    reminders: ReminderPlanner<R, C>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            reminders: self.reminders.clone(),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a lifecycle service over the given store and scheduler.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        scheduler: Arc<dyn ReminderScheduler>,
        reminder_config: ReminderConfig,
    ) -> Self {
        let reminders = ReminderPlanner::new(
            Arc::clone(&repository),
            Arc::clone(&clock),
            scheduler,
            reminder_config,
        );
        Self {
            repository,
            clock,
            reminders,
        }
    }

    /// The reminder planner this service schedules through.
    #[must_use]
    pub const fn reminders(&self) -> &ReminderPlanner<R, C> {
        &self.reminders
    }

    /// Creates a task from an extracted action item and schedules its
    /// reminders.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when validation or the store write
    /// fails.
    pub async fn create(
        &self,
        item: &ActionItem,
        meeting_id: Option<MeetingId>,
        transcript_id: Option<TranscriptId>,
    ) -> TaskLifecycleResult<TaskId> {
        let task = Task::from_action_item(item, meeting_id, transcript_id, self.clock.as_ref())?;
        let task_id = task.id();
        self.repository.insert(&task).await?;
        if let Err(error) = self.reminders.schedule_for(&task) {
            warn!(task_id = %task_id, %error, "failed to schedule reminders for new task");
        }
        info!(
            task_id = %task_id,
            assignee = %task.assignee(),
            deadline = %task.actual_deadline(),
            "task created",
        );
        Ok(task_id)
    }

    /// Creates tasks for a batch of action items sharing one provenance.
    ///
    /// Per-item failures are logged and skipped so one malformed item
    /// cannot sink the rest of the batch.
    pub async fn create_batch(
        &self,
        items: &[ActionItem],
        meeting_id: Option<MeetingId>,
        transcript_id: Option<TranscriptId>,
    ) -> Vec<TaskId> {
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            match self
                .create(item, meeting_id.clone(), transcript_id.clone())
                .await
            {
                Ok(task_id) => created.push(task_id),
                Err(error) => {
                    warn!(description = item.description(), %error, "skipping action item");
                }
            }
        }
        info!(
            created = created.len(),
            received = items.len(),
            "action item batch processed",
        );
        created
    }

    /// Applies a field patch to an existing task.
    ///
    /// A deadline change re-plans the task's reminders from the stored
    /// state after the write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the patch is invalid, the task
    /// does not exist, or the store write fails.
    pub async fn update_fields(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> TaskLifecycleResult<()> {
        patch.validate()?;
        let updated_at = self.clock.utc();
        let updated = self.repository.update(task_id, &patch, updated_at).await?;
        if !updated {
            return Err(TaskRepositoryError::NotFound(task_id).into());
        }
        if patch.changes_deadline()
            && let Err(error) = self.reminders.reschedule(task_id).await
        {
            warn!(task_id = %task_id, %error, "failed to reschedule reminders");
        }
        info!(task_id = %task_id, "task updated");
        Ok(())
    }

    /// Moves a task to [`TaskStatus::InProgress`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not exist or the
    /// store write fails.
    pub async fn mark_in_progress(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        self.update_fields(task_id, TaskPatch::new().with_status(TaskStatus::InProgress))
            .await
    }

    /// Moves a task to [`TaskStatus::Completed`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not exist or the
    /// store write fails.
    pub async fn mark_completed(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        self.update_fields(task_id, TaskPatch::new().with_status(TaskStatus::Completed))
            .await
    }

    /// Deletes a task and cancels its reminders.
    ///
    /// Reminders are cancelled before the store delete so a concurrent
    /// firing cannot race a half-removed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not exist or the
    /// store write fails.
    pub async fn delete(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        self.reminders.cancel_for(task_id);
        let deleted = self.repository.delete(task_id).await?;
        if !deleted {
            return Err(TaskRepositoryError::NotFound(task_id).into());
        }
        info!(task_id = %task_id, "task deleted");
        Ok(())
    }

    /// Fetches a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn get(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Lists tasks matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn query(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self
            .repository
            .find(filter, TaskOrdering::CreatedAtDesc)
            .await?)
    }

    /// Lists open tasks whose deadline has passed, most overdue first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn overdue(&self) -> TaskLifecycleResult<Vec<Task>> {
        let today = DeadlineDate::new(self.clock.utc().date_naive());
        let filter = TaskFilter::new().open_only().deadline_before(today);
        Ok(self
            .repository
            .find(&filter, TaskOrdering::DeadlineAsc)
            .await?)
    }

    /// Lists open tasks due between today and `horizon_days` ahead,
    /// both bounds inclusive, soonest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn upcoming(&self, horizon_days: u64) -> TaskLifecycleResult<Vec<Task>> {
        let today = self.clock.utc().date_naive();
        let until = today + chrono::Days::new(horizon_days);
        let filter = TaskFilter::new()
            .open_only()
            .deadline_between(DeadlineDate::new(today), DeadlineDate::new(until));
        Ok(self
            .repository
            .find(&filter, TaskOrdering::DeadlineAsc)
            .await?)
    }

    /// Counts tasks matching a filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the store read fails.
    pub async fn count(&self, filter: &TaskFilter) -> TaskLifecycleResult<u64> {
        Ok(self.repository.count(filter).await?)
    }
}
