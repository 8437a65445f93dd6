//! Domain types for the reminder scheduler.

mod job;

pub use job::{JobFn, JobFuture, JobKey, JobOutcome, JobSchedule};
