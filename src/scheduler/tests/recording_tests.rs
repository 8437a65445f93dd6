//! Tests for the recording scheduler used by service tests.

use crate::scheduler::adapters::RecordingScheduler;
use crate::scheduler::domain::{JobFn, JobFuture, JobKey, JobSchedule};
use crate::scheduler::ports::{ReminderScheduler, SchedulerError};
use chrono::Utc;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn noop_job() -> JobFn {
    Arc::new(|| -> JobFuture { Box::pin(async { Ok(()) }) })
}

#[rstest]
fn records_one_shot_registrations_with_their_instant() {
    let scheduler = RecordingScheduler::new();
    let when = Utc::now();
    scheduler
        .schedule_once(JobKey::new("a"), when, noop_job())
        .expect("registration should succeed");

    assert!(scheduler.contains(&JobKey::new("a")));
    assert_eq!(
        scheduler.schedule_of(&JobKey::new("a")),
        Some(JobSchedule::Once(when))
    );
}

#[rstest]
fn replaces_jobs_on_key_collision() {
    let scheduler = RecordingScheduler::new();
    scheduler
        .schedule_once(JobKey::new("a"), Utc::now(), noop_job())
        .expect("first registration should succeed");
    scheduler
        .schedule_recurring(JobKey::new("a"), Duration::from_secs(5), noop_job())
        .expect("replacement should succeed");

    assert_eq!(scheduler.job_count(), 1);
    assert_eq!(
        scheduler.schedule_of(&JobKey::new("a")),
        Some(JobSchedule::Recurring(Duration::from_secs(5)))
    );
}

#[rstest]
fn cancel_is_a_visible_no_op_for_absent_keys() {
    let scheduler = RecordingScheduler::new();
    scheduler
        .schedule_once(JobKey::new("a"), Utc::now(), noop_job())
        .expect("registration should succeed");

    assert!(scheduler.cancel(&JobKey::new("a")));
    assert!(!scheduler.cancel(&JobKey::new("a")));
    assert!(!scheduler.cancel(&JobKey::new("never-registered")));
}

#[tokio::test]
async fn recorded_jobs_can_be_fired_by_hand() {
    let scheduler = RecordingScheduler::new();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let job: JobFn = Arc::new(move || -> JobFuture {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    });
    scheduler
        .schedule_once(JobKey::new("a"), Utc::now(), job)
        .expect("registration should succeed");

    let recorded = scheduler.job(&JobKey::new("a")).expect("job should exist");
    recorded().await.expect("job should run cleanly");
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[rstest]
fn shutdown_clears_jobs_and_rejects_new_ones() {
    let scheduler = RecordingScheduler::new();
    scheduler
        .schedule_once(JobKey::new("a"), Utc::now(), noop_job())
        .expect("registration should succeed");

    scheduler.shutdown();
    assert_eq!(scheduler.job_count(), 0);
    assert_eq!(
        scheduler.schedule_once(JobKey::new("b"), Utc::now(), noop_job()),
        Err(SchedulerError::ShutDown)
    );
}
