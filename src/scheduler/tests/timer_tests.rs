//! Behavioural tests for the Tokio scheduler under paused time.
//!
//! `start_paused` lets the runtime auto-advance its clock whenever every
//! task is idle, so hour-scale triggers resolve instantly and
//! deterministically.

use crate::config::SchedulerConfig;
use crate::scheduler::adapters::TokioReminderScheduler;
use crate::scheduler::domain::{JobFn, JobFuture, JobKey};
use crate::scheduler::ports::{ReminderScheduler, SchedulerError};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time;

fn counting_job(counter: &Arc<AtomicUsize>) -> JobFn {
    let counter = Arc::clone(counter);
    Arc::new(move || -> JobFuture {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    })
}

fn failing_job() -> JobFn {
    Arc::new(|| -> JobFuture {
        Box::pin(async { Err("synthetic job failure".into()) })
    })
}

/// Gives spawned timer tasks a chance to run their cleanup.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn one_shot_job_fires_once_at_its_trigger() {
    let scheduler = TokioReminderScheduler::default();
    let fired = Arc::new(AtomicUsize::new(0));
    scheduler
        .schedule_once(
            JobKey::new("once"),
            Utc::now() + ChronoDuration::hours(1),
            counting_job(&fired),
        )
        .expect("registration should succeed");

    time::sleep(Duration::from_secs(3_700)).await;
    settle().await;

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.job_count(), 0, "finished job should deregister");
}

#[tokio::test(start_paused = true)]
async fn past_instant_fires_immediately() {
    let scheduler = TokioReminderScheduler::default();
    let fired = Arc::new(AtomicUsize::new(0));
    scheduler
        .schedule_once(
            JobKey::new("late"),
            Utc::now() - ChronoDuration::hours(2),
            counting_job(&fired),
        )
        .expect("registration should succeed");

    time::sleep(Duration::from_millis(10)).await;
    settle().await;

    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rescheduling_a_key_replaces_the_old_job() {
    let scheduler = TokioReminderScheduler::default();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    scheduler
        .schedule_once(
            JobKey::new("shared"),
            Utc::now() + ChronoDuration::hours(1),
            counting_job(&first),
        )
        .expect("first registration should succeed");
    scheduler
        .schedule_once(
            JobKey::new("shared"),
            Utc::now() + ChronoDuration::hours(2),
            counting_job(&second),
        )
        .expect("replacement should succeed");

    time::sleep(Duration::from_secs(3 * 3_600)).await;
    settle().await;

    assert_eq!(first.load(Ordering::SeqCst), 0, "replaced job must not fire");
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_jobs_never_fire() {
    let scheduler = TokioReminderScheduler::default();
    let fired = Arc::new(AtomicUsize::new(0));
    scheduler
        .schedule_once(
            JobKey::new("doomed"),
            Utc::now() + ChronoDuration::hours(1),
            counting_job(&fired),
        )
        .expect("registration should succeed");

    assert!(scheduler.cancel(&JobKey::new("doomed")));
    assert!(!scheduler.cancel(&JobKey::new("doomed")), "second cancel is a no-op");

    time::sleep(Duration::from_secs(2 * 3_600)).await;
    settle().await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn recurring_job_first_fires_one_interval_in() {
    let scheduler = TokioReminderScheduler::default();
    let fired = Arc::new(AtomicUsize::new(0));
    scheduler
        .schedule_recurring(
            JobKey::new("sweep"),
            Duration::from_secs(60),
            counting_job(&fired),
        )
        .expect("registration should succeed");

    time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0, "nothing before the first interval");

    time::sleep(Duration::from_secs(120)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 2, "fires at 60s and 120s");
}

#[tokio::test(start_paused = true)]
async fn one_failing_job_does_not_stop_others() {
    let scheduler = TokioReminderScheduler::default();
    let fired = Arc::new(AtomicUsize::new(0));

    scheduler
        .schedule_once(
            JobKey::new("broken"),
            Utc::now() + ChronoDuration::minutes(1),
            failing_job(),
        )
        .expect("registration should succeed");
    scheduler
        .schedule_once(
            JobKey::new("healthy"),
            Utc::now() + ChronoDuration::minutes(2),
            counting_job(&fired),
        )
        .expect("registration should succeed");

    time::sleep(Duration::from_secs(180)).await;
    settle().await;

    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_everything_and_rejects_registration() {
    let scheduler = TokioReminderScheduler::default();
    let fired = Arc::new(AtomicUsize::new(0));
    scheduler
        .schedule_once(
            JobKey::new("pending"),
            Utc::now() + ChronoDuration::hours(1),
            counting_job(&fired),
        )
        .expect("registration should succeed");
    scheduler
        .schedule_recurring(
            JobKey::new("periodic"),
            Duration::from_secs(60),
            counting_job(&fired),
        )
        .expect("registration should succeed");

    scheduler.shutdown();
    time::sleep(Duration::from_secs(2 * 3_600)).await;
    settle().await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(
        scheduler.schedule_once(JobKey::new("rejected"), Utc::now(), counting_job(&fired)),
        Err(SchedulerError::ShutDown)
    );
}

#[tokio::test(start_paused = true)]
async fn instance_bound_skips_overlapping_firings_of_one_job() {
    let scheduler = TokioReminderScheduler::new(SchedulerConfig {
        max_workers: 20,
        max_instances_per_job: 1,
    });
    let started = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&started);
    // Each run outlasts several intervals, so subsequent ticks must skip.
    let slow_job: JobFn = Arc::new(move || -> JobFuture {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            time::sleep(Duration::from_secs(500)).await;
            Ok(())
        })
    });
    scheduler
        .schedule_recurring(JobKey::new("slow"), Duration::from_secs(60), slow_job)
        .expect("registration should succeed");

    time::sleep(Duration::from_secs(250)).await;
    settle().await;

    assert_eq!(started.load(Ordering::SeqCst), 1, "overlapping firings are skipped");
}
