//! Aggregate counts over the task store.

use mockable::Clock;
use serde::Serialize;

use crate::task::domain::TaskStatus;
use crate::task::ports::{TaskFilter, TaskRepository};
use crate::task::services::lifecycle::{TaskLifecycleResult, TaskLifecycleService};

/// A point-in-time summary of the task store.
///
/// `overdue` and `upcoming` only count open tasks, so they overlap with
/// the status counts but never with each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    /// Every stored task regardless of status.
    pub total: u64,
    /// Tasks not yet started.
    pub pending: u64,
    /// Tasks currently being worked.
    pub in_progress: u64,
    /// Tasks finished.
    pub completed: u64,
    /// Open tasks whose deadline has passed.
    pub overdue: u64,
    /// Open tasks due within the reminder horizon.
    pub upcoming: u64,
}

/// Computes [`TaskStatistics`] snapshots.
pub struct TaskStatisticsService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    lifecycle: TaskLifecycleService<R, C>,
    upcoming_horizon_days: u64,
}

impl<R, C> TaskStatisticsService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a statistics service over an existing lifecycle service.
    #[must_use]
    pub const fn new(lifecycle: TaskLifecycleService<R, C>, upcoming_horizon_days: u64) -> Self {
        Self {
            lifecycle,
            upcoming_horizon_days,
        }
    }

    /// Takes a snapshot of the store.
    ///
    /// The counts are separate reads, not one transaction, so a write
    /// landing mid-snapshot can skew totals by one. Acceptable for a
    /// reporting surface.
    ///
    /// # Errors
    ///
    /// Returns an error when any underlying store read fails.
    pub async fn statistics(&self) -> TaskLifecycleResult<TaskStatistics> {
        let total = self.lifecycle.count(&TaskFilter::new()).await?;
        let pending = self.count_status(TaskStatus::Pending).await?;
        let in_progress = self.count_status(TaskStatus::InProgress).await?;
        let completed = self.count_status(TaskStatus::Completed).await?;
        let overdue = self.lifecycle.overdue().await?.len() as u64;
        let upcoming = self
            .lifecycle
            .upcoming(self.upcoming_horizon_days)
            .await?
            .len() as u64;
        Ok(TaskStatistics {
            total,
            pending,
            in_progress,
            completed,
            overdue,
            upcoming,
        })
    }

    async fn count_status(&self, status: TaskStatus) -> TaskLifecycleResult<u64> {
        self.lifecycle
            .count(&TaskFilter::new().with_status(status))
            .await
    }
}

impl<R, C> Clone for TaskStatisticsService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            upcoming_horizon_days: self.upcoming_horizon_days,
        }
    }
}
