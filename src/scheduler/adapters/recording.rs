//! Recording scheduler for tests and dry runs.
//!
//! Registers jobs without running any timers. Tests inspect which keys
//! are registered and with what schedule, and may invoke a recorded
//! callback by hand to simulate a firing.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::scheduler::domain::{JobFn, JobKey, JobSchedule};
use crate::scheduler::ports::{ReminderScheduler, SchedulerError, SchedulerResult};

/// Scheduler that records registrations instead of firing them.
#[derive(Clone, Default)]
pub struct RecordingScheduler {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Default)]
struct RecordingState {
    jobs: HashMap<JobKey, RecordedJob>,
    shut_down: bool,
}

struct RecordedJob {
    schedule: JobSchedule,
    job: JobFn,
}

impl RecordingScheduler {
    /// Creates an empty recording scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns whether a job is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &JobKey) -> bool {
        self.lock().jobs.contains_key(key)
    }

    /// Returns the recorded schedule for `key`, if registered.
    #[must_use]
    pub fn schedule_of(&self, key: &JobKey) -> Option<JobSchedule> {
        self.lock().jobs.get(key).map(|entry| entry.schedule)
    }

    /// Returns the recorded callback for `key`, if registered.
    #[must_use]
    pub fn job(&self, key: &JobKey) -> Option<JobFn> {
        self.lock().jobs.get(key).map(|entry| Arc::clone(&entry.job))
    }

    /// Returns all registered keys in sorted order.
    #[must_use]
    pub fn scheduled_keys(&self) -> Vec<JobKey> {
        let mut keys: Vec<JobKey> = self.lock().jobs.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the number of registered jobs.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.lock().jobs.len()
    }

    fn insert(&self, key: JobKey, schedule: JobSchedule, job: JobFn) -> SchedulerResult<()> {
        let mut state = self.lock();
        if state.shut_down {
            return Err(SchedulerError::ShutDown);
        }
        state.jobs.insert(key, RecordedJob { schedule, job });
        Ok(())
    }
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule_once(&self, key: JobKey, when: DateTime<Utc>, job: JobFn) -> SchedulerResult<()> {
        self.insert(key, JobSchedule::Once(when), job)
    }

    fn schedule_recurring(&self, key: JobKey, every: Duration, job: JobFn) -> SchedulerResult<()> {
        self.insert(key, JobSchedule::Recurring(every), job)
    }

    fn cancel(&self, key: &JobKey) -> bool {
        self.lock().jobs.remove(key).is_some()
    }

    fn shutdown(&self) {
        let mut state = self.lock();
        state.shut_down = true;
        state.jobs.clear();
    }
}
