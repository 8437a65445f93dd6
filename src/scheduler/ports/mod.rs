//! Port contracts for the reminder scheduler.

pub mod scheduler;

pub use scheduler::{ReminderScheduler, SchedulerError, SchedulerResult};
