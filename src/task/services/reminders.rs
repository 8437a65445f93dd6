//! Reminder planning: keeping scheduler jobs consistent with task state.
//!
//! Every task carries up to three jobs, keyed so that re-scheduling
//! replaces rather than duplicates:
//!
//! | key | trigger |
//! |---|---|
//! | `reminder_1day_<id>` | once, at deadline minus one day |
//! | `reminder_deadline_<id>` | once, at the deadline |
//! | `overdue_check_<id>` | recurring daily overdue sweep |
//!
//! Status changes never touch the scheduler; a reminder firing for a task
//! that has since completed checks status at fire time and stays silent.
//! Only deletion and deadline changes force cancellation.

use chrono::Duration as ChronoDuration;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ReminderConfig;
use crate::scheduler::domain::{JobFn, JobFuture, JobKey};
use crate::scheduler::ports::{ReminderScheduler, SchedulerError, SchedulerResult};
use crate::task::domain::{DeadlineDate, Task, TaskId};
use crate::task::ports::{
    TaskFilter, TaskOrdering, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};

/// The three reminder jobs attached to every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    /// One-shot nudge a day ahead of the deadline.
    OneDayBefore,
    /// One-shot nudge on the deadline day itself.
    DeadlineDay,
    /// Recurring sweep over all overdue open tasks.
    OverdueCheck,
}

impl ReminderKind {
    /// Every reminder kind, in scheduling order.
    pub const ALL: [Self; 3] = [Self::OneDayBefore, Self::DeadlineDay, Self::OverdueCheck];

    /// Returns the scheduler key for this kind on the given task.
    ///
    /// The key patterns are part of the deployed job-store schema and
    /// must not change.
    #[must_use]
    pub fn key(self, task_id: TaskId) -> JobKey {
        match self {
            Self::OneDayBefore => JobKey::new(format!("reminder_1day_{task_id}")),
            Self::DeadlineDay => JobKey::new(format!("reminder_deadline_{task_id}")),
            Self::OverdueCheck => JobKey::new(format!("overdue_check_{task_id}")),
        }
    }

    /// Human-readable trigger description used in reminder log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneDayBefore => "1 day before deadline",
            Self::DeadlineDay => "deadline today",
            Self::OverdueCheck => "overdue check",
        }
    }
}

/// Errors surfaced by reminder re-scheduling.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Reading task state back from the store failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Job registration failed.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Plans, cancels, and delivers reminder jobs for tasks.
pub struct ReminderPlanner<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
    scheduler: Arc<dyn ReminderScheduler>,
    config: ReminderConfig,
}

impl<R, C> Clone for ReminderPlanner<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            scheduler: Arc::clone(&self.scheduler),
            config: self.config,
        }
    }
}

impl<R, C> ReminderPlanner<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a reminder planner.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        scheduler: Arc<dyn ReminderScheduler>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            scheduler,
            config,
        }
    }

    /// Registers this task's reminder jobs.
    ///
    /// The day-before job is only registered while its instant is still
    /// ahead, the deadline-day job while the deadline is today or later;
    /// the overdue sweep is always registered. Idempotent: keys replace.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when the scheduler refuses registration.
    pub fn schedule_for(&self, task: &Task) -> SchedulerResult<()> {
        let now = self.clock.utc();
        let task_id = task.id();
        let deadline = task.actual_deadline();
        let deadline_instant = deadline.midnight_utc();

        let day_before = deadline_instant - ChronoDuration::days(1);
        if day_before > now {
            self.scheduler.schedule_once(
                ReminderKind::OneDayBefore.key(task_id),
                day_before,
                self.reminder_job(task_id, ReminderKind::OneDayBefore),
            )?;
        }

        if deadline.date() >= now.date_naive() {
            self.scheduler.schedule_once(
                ReminderKind::DeadlineDay.key(task_id),
                deadline_instant,
                self.reminder_job(task_id, ReminderKind::DeadlineDay),
            )?;
        }

        self.scheduler.schedule_recurring(
            ReminderKind::OverdueCheck.key(task_id),
            Duration::from_secs(self.config.overdue_sweep_interval_secs),
            self.sweep_job(),
        )?;
        Ok(())
    }

    /// Cancels every reminder job keyed to the task.
    ///
    /// Best-effort cleanup: returns how many jobs were actually removed,
    /// and absent keys are silently skipped.
    pub fn cancel_for(&self, task_id: TaskId) -> usize {
        ReminderKind::ALL
            .iter()
            .filter(|kind| self.scheduler.cancel(&kind.key(task_id)))
            .count()
    }

    /// Cancels and re-registers reminders from current store state.
    ///
    /// Used after a deadline change. A task deleted in the meantime ends
    /// up with no jobs, which is the correct steady state.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError`] when the store read or the registration
    /// fails; cancellation itself cannot fail.
    pub async fn reschedule(&self, task_id: TaskId) -> Result<(), ReminderError> {
        self.cancel_for(task_id);
        if let Some(task) = self.repository.find_by_id(task_id).await? {
            self.schedule_for(&task)?;
        }
        Ok(())
    }

    /// Delivers one reminder, re-reading task state at fire time.
    ///
    /// Returns whether a reminder was actually emitted: `false` when the
    /// task no longer exists or is no longer open.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError`] when the store read fails.
    pub async fn deliver(&self, task_id: TaskId, kind: ReminderKind) -> TaskRepositoryResult<bool> {
        let Some(task) = self.repository.find_by_id(task_id).await? else {
            return Ok(false);
        };
        if !task.status().is_open() {
            return Ok(false);
        }
        info!(
            task_id = %task_id,
            description = %task.description(),
            assignee = %task.assignee(),
            priority = %task.priority(),
            trigger = kind.label(),
            "task reminder",
        );
        Ok(true)
    }

    /// Logs every overdue open task and returns how many there were.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError`] when the store read fails.
    pub async fn sweep_overdue(&self) -> TaskRepositoryResult<usize> {
        let today = DeadlineDate::new(self.clock.utc().date_naive());
        let filter = TaskFilter::new().open_only().deadline_before(today);
        let overdue = self
            .repository
            .find(&filter, TaskOrdering::DeadlineAsc)
            .await?;
        for task in &overdue {
            warn!(
                task_id = %task.id(),
                description = %task.description(),
                assignee = %task.assignee(),
                deadline = %task.actual_deadline(),
                "task overdue",
            );
        }
        Ok(overdue.len())
    }

    fn reminder_job(&self, task_id: TaskId, kind: ReminderKind) -> JobFn {
        let planner = self.clone();
        Arc::new(move || -> JobFuture {
            let planner = planner.clone();
            Box::pin(async move {
                planner.deliver(task_id, kind).await?;
                Ok(())
            })
        })
    }

    fn sweep_job(&self) -> JobFn {
        let planner = self.clone();
        Arc::new(move || -> JobFuture {
            let planner = planner.clone();
            Box::pin(async move {
                planner.sweep_overdue().await?;
                Ok(())
            })
        })
    }
}
