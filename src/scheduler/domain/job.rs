//! Job keys, schedules, and the callback shape jobs execute.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Logical identifier for a scheduled job.
///
/// Scheduling a second job under the same key replaces the first;
/// cancellation is a lookup-and-remove on this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobKey(String);

impl JobKey {
    /// Creates a job key.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JobKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When a job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSchedule {
    /// Fires once at the given UTC instant; a past instant fires
    /// immediately.
    Once(DateTime<Utc>),
    /// Fires repeatedly; the first firing is one interval after
    /// registration.
    Recurring(Duration),
}

/// Outcome of a single job invocation.
///
/// Failures are logged by the scheduler and never propagate into its
/// timer loop; one failing job must not stop others.
pub type JobOutcome = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Future produced by invoking a job callback.
pub type JobFuture = Pin<Box<dyn Future<Output = JobOutcome> + Send>>;

/// Shared job callback; invoked once per firing.
pub type JobFn = Arc<dyn Fn() -> JobFuture + Send + Sync>;
