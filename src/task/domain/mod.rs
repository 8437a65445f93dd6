//! Domain model for task lifecycle management.
//!
//! The task domain models action-item normalisation, deadline resolution,
//! and status changes while keeping all infrastructure concerns outside of
//! the domain boundary.

mod action_item;
mod deadline;
mod error;
mod ids;
mod task;

pub use action_item::ActionItem;
pub use deadline::{DeadlineDate, suggest_deadline};
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{MeetingId, TaskId, TranscriptId};
pub use task::{PersistedTaskData, Priority, Task, TaskPatch, TaskStatus, UNASSIGNED};
