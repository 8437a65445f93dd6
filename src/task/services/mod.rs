//! Application services for task lifecycle orchestration.

mod facade;
mod lifecycle;
mod reminders;
mod statistics;

pub use facade::TaskFacade;
pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
pub use reminders::{ReminderError, ReminderKind, ReminderPlanner};
pub use statistics::{TaskStatistics, TaskStatisticsService};
