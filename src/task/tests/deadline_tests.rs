//! Tests for deadline parsing and the deadline suggestion heuristic.

use super::support::FixedClock;
use crate::task::domain::{DeadlineDate, TaskDomainError, suggest_deadline};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::on_date(2024, 1, 15)
}

#[rstest]
fn parse_accepts_iso_dates() {
    let deadline = DeadlineDate::parse("2024-03-01").expect("valid date");
    assert_eq!(deadline.to_string(), "2024-03-01");
}

#[rstest]
#[case("2024-02-30")]
#[case("tomorrow")]
#[case("")]
fn parse_rejects_non_dates(#[case] raw: &str) {
    assert_eq!(
        DeadlineDate::parse(raw),
        Err(TaskDomainError::InvalidDeadline(raw.to_owned()))
    );
}

#[rstest]
#[case("Send the figures ASAP", "2024-01-16")]
#[case("this is URGENT, fix the outage", "2024-01-16")]
#[case("must land today", "2024-01-16")]
#[case("prepare the board deck for next week", "2024-01-18")]
#[case("important: refresh the onboarding docs", "2024-01-18")]
#[case("tidy up the wiki at some point", "2024-01-22")]
fn keyword_heuristic_maps_urgency_to_horizon(
    clock: FixedClock,
    #[case] text: &str,
    #[case] expected: &str,
) {
    let deadline = suggest_deadline(text, &clock);
    assert_eq!(deadline.to_string(), expected);
}

#[rstest]
fn urgent_keywords_win_over_soon_keywords(clock: FixedClock) {
    let deadline = suggest_deadline("urgent but also soon", &clock);
    assert_eq!(deadline.to_string(), "2024-01-16");
}

#[rstest]
fn heuristic_is_case_insensitive(clock: FixedClock) {
    assert_eq!(
        suggest_deadline("HANDLE THIS IMMEDIATELY", &clock),
        suggest_deadline("handle this immediately", &clock)
    );
}

#[rstest]
fn heuristic_is_deterministic_for_fixed_clock(clock: FixedClock) {
    let first = suggest_deadline("review the contract soon", &clock);
    let second = suggest_deadline("review the contract soon", &clock);
    assert_eq!(first, second);
}

#[rstest]
fn midnight_utc_is_start_of_day() {
    let deadline = DeadlineDate::parse("2024-01-20").expect("valid date");
    let instant = deadline.midnight_utc();
    assert_eq!(instant.to_rfc3339(), "2024-01-20T00:00:00+00:00");
}
