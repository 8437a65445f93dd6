//! Shared helpers for integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use traction::task::domain::{ActionItem, Task};

/// A clock pinned to a known instant so date arithmetic is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to midnight UTC on the given date.
    pub fn on_date(year: i32, month: u32, day: u32) -> Self {
        Self::at_time(year, month, day, 0, 0, 0)
    }

    /// Pins the clock to an exact UTC instant.
    pub fn at_time(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .expect("valid timestamp");
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a pending task with an explicit deadline, created at the
/// clock's instant.
pub fn task_created_at(description: &str, deadline: &str, clock: &FixedClock) -> Task {
    let item = ActionItem::new(description).with_actual_deadline(deadline);
    Task::from_action_item(&item, None, None, clock).expect("valid action item")
}
