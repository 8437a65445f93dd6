//! Tests for job keys and schedules.

use crate::scheduler::domain::{JobKey, JobSchedule};
use chrono::Utc;
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn job_key_displays_its_raw_value() {
    let key = JobKey::new("reminder_1day_abc");
    assert_eq!(key.to_string(), "reminder_1day_abc");
    assert_eq!(key.as_str(), "reminder_1day_abc");
}

#[rstest]
fn job_keys_compare_by_value() {
    assert_eq!(JobKey::new("a"), JobKey::new("a"));
    assert_ne!(JobKey::new("a"), JobKey::new("b"));
    assert!(JobKey::new("a") < JobKey::new("b"));
}

#[rstest]
fn job_key_serialises_transparently() {
    let key = JobKey::new("overdue_check_42");
    let json = serde_json::to_string(&key).expect("key should serialise");
    assert_eq!(json, "\"overdue_check_42\"");
}

#[rstest]
fn schedules_carry_their_trigger() {
    let when = Utc::now();
    assert_eq!(JobSchedule::Once(when), JobSchedule::Once(when));
    assert_eq!(
        JobSchedule::Recurring(Duration::from_secs(60)),
        JobSchedule::Recurring(Duration::from_secs(60)),
    );
    assert_ne!(
        JobSchedule::Once(when),
        JobSchedule::Recurring(Duration::from_secs(60)),
    );
}
