//! Raw action items as emitted by the AI extraction collaborator.

use serde::{Deserialize, Serialize};

/// Candidate task extracted from meeting content.
///
/// This is untrusted input: every field may be missing, empty, or carry
/// an out-of-vocabulary value. Normalisation happens when the item is
/// turned into a [`Task`](super::Task), never here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(rename = "task", default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actual_deadline: Option<String>,
}

impl ActionItem {
    /// Creates an action item with the given free-form description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the extracted assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the extracted priority label (free-form, coerced later).
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the surrounding meeting context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the heuristically suggested deadline string.
    #[must_use]
    pub fn with_suggested_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.suggested_deadline = Some(deadline.into());
        self
    }

    /// Sets an explicit deadline overriding the suggestion.
    #[must_use]
    pub fn with_actual_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.actual_deadline = Some(deadline.into());
        self
    }

    /// Returns the raw description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the raw assignee, if extracted.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the raw priority label, if extracted.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Returns the raw context, if extracted.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the suggested deadline string, if present.
    #[must_use]
    pub fn suggested_deadline(&self) -> Option<&str> {
        self.suggested_deadline.as_deref()
    }

    /// Returns the explicit deadline string, if present.
    #[must_use]
    pub fn actual_deadline(&self) -> Option<&str> {
        self.actual_deadline.as_deref()
    }
}
