//! Task aggregate root and related task lifecycle types.

use super::{
    ActionItem, DeadlineDate, MeetingId, ParsePriorityError, ParseTaskStatusError,
    TaskDomainError, TaskId, TranscriptId,
};
use chrono::{DateTime, Days, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assignee recorded when the AI collaborator could not extract one.
pub const UNASSIGNED: &str = "TBD";

/// Days added to the creation date when no deadline is supplied at all.
const DEFAULT_DEADLINE_DAYS: u64 = 7;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// Task is being worked on.
    InProgress,
    /// Task work is finished.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns whether the task still needs attention.
    ///
    /// Open tasks (pending or in progress) are the only ones that appear in
    /// overdue and upcoming views and the only ones reminders fire for.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Needs attention before everything else.
    High,
    /// Normal priority; also the coercion fallback.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Coerces an untrusted priority label into the closed enumeration.
    ///
    /// Lower-cases and trims the input; any value outside
    /// {`high`, `medium`, `low`} becomes [`Priority::Medium`]. Out-of-set
    /// input is expected from the AI collaborator and is never an error.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        Self::try_from(raw).unwrap_or_default()
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task aggregate root.
///
/// Serialised field names are the de facto persistence schema shared with
/// the rest of the deployment and must not change: `task`, `assignee`,
/// `priority`, `context`, `status`, `meeting_id`, `transcript_id`,
/// `suggested_deadline`, `actual_deadline`, `created_at`, `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    #[serde(rename = "task")]
    description: String,
    assignee: String,
    priority: Priority,
    context: String,
    status: TaskStatus,
    meeting_id: Option<MeetingId>,
    transcript_id: Option<TranscriptId>,
    suggested_deadline: Option<DeadlineDate>,
    actual_deadline: DeadlineDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee.
    pub assignee: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted context.
    pub context: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted meeting reference, if any.
    pub meeting_id: Option<MeetingId>,
    /// Persisted transcript reference, if any.
    pub transcript_id: Option<TranscriptId>,
    /// Persisted suggested deadline, if any.
    pub suggested_deadline: Option<DeadlineDate>,
    /// Persisted governing deadline.
    pub actual_deadline: DeadlineDate,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from an untrusted action item.
    ///
    /// Normalisation: strings are trimmed, a missing assignee becomes
    /// [`UNASSIGNED`], and the priority label is coerced into the closed
    /// enumeration. The governing deadline resolves in order: explicit
    /// actual deadline, then suggested deadline, then creation time plus
    /// seven days.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description
    /// is empty after trimming, or [`TaskDomainError::InvalidDeadline`]
    /// when a supplied deadline string is not a valid `YYYY-MM-DD` date.
    pub fn from_action_item(
        item: &ActionItem,
        meeting_id: Option<MeetingId>,
        transcript_id: Option<TranscriptId>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let description = item.description().trim();
        if description.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }

        let assignee = item
            .assignee()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNASSIGNED);
        let priority = item.priority().map(Priority::coerce).unwrap_or_default();
        let context = item.context().map(str::trim).unwrap_or_default();

        let suggested_deadline = item
            .suggested_deadline()
            .map(DeadlineDate::parse)
            .transpose()?;
        let explicit_deadline = item
            .actual_deadline()
            .map(DeadlineDate::parse)
            .transpose()?;

        let timestamp = clock.utc();
        let actual_deadline = explicit_deadline
            .or(suggested_deadline)
            .unwrap_or_else(|| {
                DeadlineDate::new(timestamp.date_naive() + Days::new(DEFAULT_DEADLINE_DAYS))
            });

        Ok(Self {
            id: TaskId::new(),
            description: description.to_owned(),
            assignee: assignee.to_owned(),
            priority,
            context: context.to_owned(),
            status: TaskStatus::Pending,
            meeting_id,
            transcript_id,
            suggested_deadline,
            actual_deadline,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            assignee: data.assignee,
            priority: data.priority,
            context: data.context,
            status: data.status,
            meeting_id: data.meeting_id,
            transcript_id: data.transcript_id,
            suggested_deadline: data.suggested_deadline,
            actual_deadline: data.actual_deadline,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee.
    #[must_use]
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the surrounding meeting context.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the originating meeting reference, if any.
    #[must_use]
    pub const fn meeting_id(&self) -> Option<&MeetingId> {
        self.meeting_id.as_ref()
    }

    /// Returns the originating transcript reference, if any.
    #[must_use]
    pub const fn transcript_id(&self) -> Option<&TranscriptId> {
        self.transcript_id.as_ref()
    }

    /// Returns the heuristically suggested deadline, if any.
    #[must_use]
    pub const fn suggested_deadline(&self) -> Option<DeadlineDate> {
        self.suggested_deadline
    }

    /// Returns the deadline that governs scheduling.
    #[must_use]
    pub const fn actual_deadline(&self) -> DeadlineDate {
        self.actual_deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merges a validated patch into this task and stamps `updated_at`.
    ///
    /// Callers must run [`TaskPatch::validate`] first; an invalid
    /// description in the patch is ignored here rather than applied.
    pub fn apply_patch(&mut self, patch: &TaskPatch, updated_at: DateTime<Utc>) {
        if let Some(ref description) = patch.description {
            let trimmed = description.trim();
            if !trimmed.is_empty() {
                self.description = trimmed.to_owned();
            }
        }
        if let Some(ref assignee) = patch.assignee {
            self.assignee = assignee.trim().to_owned();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(ref context) = patch.context {
            self.context = context.trim().to_owned();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(actual_deadline) = patch.actual_deadline {
            self.actual_deadline = actual_deadline;
        }
        self.updated_at = updated_at;
    }
}

/// Partial update merged into a stored task.
///
/// Any combination of fields may be present; absent fields are left
/// untouched. Status changes carry no state-machine guard: completing a
/// pending task directly is permitted as a manual override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement description, trimmed on application.
    pub description: Option<String>,
    /// Replacement assignee.
    pub assignee: Option<String>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement context.
    pub context: Option<String>,
    /// Replacement lifecycle status.
    pub status: Option<TaskStatus>,
    /// Replacement governing deadline; triggers reminder re-scheduling.
    pub actual_deadline: Option<DeadlineDate>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a replacement assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets a replacement priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a replacement context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets a replacement status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a replacement governing deadline.
    #[must_use]
    pub const fn with_actual_deadline(mut self, deadline: DeadlineDate) -> Self {
        self.actual_deadline = Some(deadline);
        self
    }

    /// Returns whether the patch changes the governing deadline.
    #[must_use]
    pub const fn changes_deadline(&self) -> bool {
        self.actual_deadline.is_some()
    }

    /// Returns whether the patch carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.assignee.is_none()
            && self.priority.is_none()
            && self.context.is_none()
            && self.status.is_none()
            && self.actual_deadline.is_none()
    }

    /// Validates patch contents against domain rules.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when a replacement
    /// description is present but empty after trimming.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if let Some(ref description) = self.description
            && description.trim().is_empty()
        {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(())
    }
}
