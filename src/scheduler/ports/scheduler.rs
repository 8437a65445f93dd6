//! Scheduler port: time-keyed callback registration and cancellation.

use crate::scheduler::domain::{JobFn, JobKey};
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Result type for scheduler registration operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Background job registry contract.
///
/// Registration returns immediately; firing happens asynchronously with
/// at-least-once semantics and no ordering guarantee across keys.
/// Replacing a key is not atomic against a firing of the old job already
/// in flight - an accepted race, since reminder delivery is informational
/// and idempotent.
pub trait ReminderScheduler: Send + Sync {
    /// Registers a one-shot callback at the given UTC instant.
    ///
    /// Replaces any existing job under the same key; never duplicates.
    /// An instant already in the past fires immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ShutDown`] when the scheduler has been
    /// shut down.
    fn schedule_once(&self, key: JobKey, when: DateTime<Utc>, job: JobFn) -> SchedulerResult<()>;

    /// Registers a periodic callback firing every `every`.
    ///
    /// Replaces any existing job under the same key. The first firing
    /// happens one interval after registration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ShutDown`] when the scheduler has been
    /// shut down.
    fn schedule_recurring(&self, key: JobKey, every: Duration, job: JobFn) -> SchedulerResult<()>;

    /// Cancels the job registered under `key`.
    ///
    /// Returns whether a job was actually removed; an absent key is a
    /// no-op, never an error.
    fn cancel(&self, key: &JobKey) -> bool;

    /// Cancels every registered job and refuses further registration.
    ///
    /// Must run at process shutdown so no orphaned timers outlive the
    /// application.
    fn shutdown(&self);
}

/// Errors returned by scheduler implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The scheduler has been shut down and accepts no new jobs.
    #[error("scheduler is shut down")]
    ShutDown,
}
