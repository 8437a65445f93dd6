//! Calendar-date deadlines and the keyword deadline heuristic.

use super::TaskDomainError;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keywords that pull the suggested deadline in to one day out.
const URGENT_KEYWORDS: [&str; 7] = [
    "urgent",
    "asap",
    "immediately",
    "today",
    "tomorrow",
    "deadline",
    "critical",
];

/// Keywords that pull the suggested deadline in to three days out.
const SOON_KEYWORDS: [&str; 4] = ["next week", "soon", "priority", "important"];

/// Calendar date governing task scheduling, serialised as `YYYY-MM-DD`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DeadlineDate(NaiveDate);

impl DeadlineDate {
    /// Wraps an already-validated calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a `YYYY-MM-DD` deadline string.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDeadline`] when the value is not a
    /// valid calendar date in that format.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| TaskDomainError::InvalidDeadline(value.to_owned()))
    }

    /// Returns the wrapped calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Returns the UTC instant at which this deadline's day begins.
    ///
    /// Deadlines are dates, not instants; midnight UTC is the canonical
    /// trigger point for reminder jobs keyed to the date.
    #[must_use]
    pub fn midnight_utc(self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }
}

impl fmt::Display for DeadlineDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Suggests a deadline from free-form task text.
///
/// Scans the text case-insensitively: any urgent keyword yields one day
/// out, otherwise any medium-urgency keyword yields three days, otherwise
/// the default of seven days applies. Deterministic for a fixed clock.
#[must_use]
pub fn suggest_deadline(task_text: &str, clock: &impl Clock) -> DeadlineDate {
    let lowered = task_text.to_lowercase();
    let days_ahead = if URGENT_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        1
    } else if SOON_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        3
    } else {
        7
    };
    DeadlineDate::new(clock.utc().date_naive() + Days::new(days_ahead))
}
