//! Repository port for task persistence, lookup, and filtered queries.

use crate::task::domain::{
    DeadlineDate, MeetingId, Priority, Task, TaskId, TaskPatch, TaskStatus, TranscriptId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Exact-match filter over task fields, combined with logical AND.
///
/// An empty filter matches every task. Deadline bounds compare calendar
/// dates; `deadline_before` is strict, the window bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Match a single status exactly.
    pub status: Option<TaskStatus>,
    /// Restrict to open statuses (pending or in progress).
    pub open_only: bool,
    /// Match the assignee exactly.
    pub assignee: Option<String>,
    /// Match the priority exactly.
    pub priority: Option<Priority>,
    /// Match the originating meeting reference.
    pub meeting_id: Option<MeetingId>,
    /// Match the originating transcript reference.
    pub transcript_id: Option<TranscriptId>,
    /// Match tasks whose deadline is strictly before this date.
    pub deadline_before: Option<DeadlineDate>,
    /// Match tasks whose deadline is on or after this date.
    pub deadline_from: Option<DeadlineDate>,
    /// Match tasks whose deadline is on or before this date.
    pub deadline_to: Option<DeadlineDate>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one exact status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to open tasks (pending or in progress).
    #[must_use]
    pub const fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    /// Restricts to one assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to tasks from one meeting.
    #[must_use]
    pub fn for_meeting(mut self, meeting_id: MeetingId) -> Self {
        self.meeting_id = Some(meeting_id);
        self
    }

    /// Restricts to tasks from one transcript.
    #[must_use]
    pub fn for_transcript(mut self, transcript_id: TranscriptId) -> Self {
        self.transcript_id = Some(transcript_id);
        self
    }

    /// Restricts to deadlines strictly before the given date.
    #[must_use]
    pub const fn deadline_before(mut self, date: DeadlineDate) -> Self {
        self.deadline_before = Some(date);
        self
    }

    /// Restricts to deadlines within the inclusive date window.
    #[must_use]
    pub const fn deadline_between(mut self, from: DeadlineDate, to: DeadlineDate) -> Self {
        self.deadline_from = Some(from);
        self.deadline_to = Some(to);
        self
    }

    /// Returns whether the task satisfies every present predicate.
    ///
    /// Shared by in-process adapters; SQL adapters translate the same
    /// predicates into a WHERE clause instead.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status() != status
        {
            return false;
        }
        if self.open_only && !task.status().is_open() {
            return false;
        }
        if let Some(ref assignee) = self.assignee
            && task.assignee() != assignee
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority() != priority
        {
            return false;
        }
        if let Some(ref meeting_id) = self.meeting_id
            && task.meeting_id() != Some(meeting_id)
        {
            return false;
        }
        if let Some(ref transcript_id) = self.transcript_id
            && task.transcript_id() != Some(transcript_id)
        {
            return false;
        }
        if let Some(before) = self.deadline_before
            && task.actual_deadline() >= before
        {
            return false;
        }
        if let Some(from) = self.deadline_from
            && task.actual_deadline() < from
        {
            return false;
        }
        if let Some(to) = self.deadline_to
            && task.actual_deadline() > to
        {
            return false;
        }
        true
    }
}

/// Result orderings the core relies on as contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrdering {
    /// Most recently created first (the general query contract).
    CreatedAtDesc,
    /// Earliest deadline first (overdue and upcoming views).
    DeadlineAsc,
}

/// Task persistence contract.
///
/// The store is the single source of truth: services never cache task
/// state across calls, and `update` is atomic per document, so no
/// additional locking is layered on top. Concurrent updates to the same
/// task race at last-write-wins.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks matching the filter, in the requested order.
    async fn find(
        &self,
        filter: &TaskFilter,
        order: TaskOrdering,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Merges a patch into the stored task and stamps `updated_at`.
    ///
    /// Returns `false` when no task with the given ID exists; existence
    /// handling is the caller's policy, not the store's.
    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool>;

    /// Removes a task. Returns `false` when it was already absent.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Counts tasks matching the filter.
    async fn count(&self, filter: &TaskFilter) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The underlying store is unreachable or failed.
    ///
    /// Propagated to callers uncaught; retries, if any, belong to the
    /// store collaborator.
    #[error("task store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a store-level failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
