//! Tokio-backed reminder scheduler.
//!
//! Each registered job gets its own spawned timer task that races the
//! trigger against a per-job [`CancellationToken`]. Firing draws a permit
//! from a global pool (the worker ceiling) and, for recurring jobs, from a
//! per-job instance bound, so backed-up firings cannot exhaust resources.
//!
//! Must be constructed and used inside a Tokio runtime.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::config::SchedulerConfig;
use crate::scheduler::domain::{JobFn, JobKey};
use crate::scheduler::ports::{ReminderScheduler, SchedulerError, SchedulerResult};

/// Reminder scheduler running jobs on background Tokio tasks.
pub struct TokioReminderScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    jobs: Mutex<HashMap<JobKey, JobEntry>>,
    pool: Arc<Semaphore>,
    max_instances: usize,
    shut_down: AtomicBool,
    generations: AtomicU64,
}

/// Registry entry for one scheduled job.
///
/// The generation disambiguates an entry from its replacement under the
/// same key, so a finished timer task only cleans up its own entry.
struct JobEntry {
    token: CancellationToken,
    generation: u64,
}

impl TokioReminderScheduler {
    /// Creates a scheduler with the given pool bounds.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                jobs: Mutex::new(HashMap::new()),
                pool: Arc::new(Semaphore::new(config.max_workers.max(1))),
                max_instances: config.max_instances_per_job.max(1),
                shut_down: AtomicBool::new(false),
                generations: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the number of currently registered jobs.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.inner.lock_jobs().len()
    }
}

impl Default for TokioReminderScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Inner {
    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, HashMap<JobKey, JobEntry>> {
        // A poisoned registry still holds valid cancellation handles.
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a fresh registry entry, cancelling any job it replaces.
    fn register(&self, key: &JobKey) -> SchedulerResult<(CancellationToken, u64)> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(SchedulerError::ShutDown);
        }
        let token = CancellationToken::new();
        let generation = self.generations.fetch_add(1, Ordering::SeqCst);
        let replaced = self.lock_jobs().insert(
            key.clone(),
            JobEntry {
                token: token.clone(),
                generation,
            },
        );
        if let Some(old) = replaced {
            old.token.cancel();
        }
        Ok((token, generation))
    }

    /// Removes the entry for `key` if it still belongs to `generation`.
    fn deregister(&self, key: &JobKey, generation: u64) {
        let mut jobs = self.lock_jobs();
        if jobs.get(key).is_some_and(|entry| entry.generation == generation) {
            jobs.remove(key);
        }
    }

    /// Runs one firing of a job under the global pool permit.
    ///
    /// Failures and panics are logged and contained here; nothing
    /// propagates back into the timer loop that triggered the firing.
    async fn fire(&self, key: &JobKey, job: &JobFn) {
        let Ok(permit) = Arc::clone(&self.pool).acquire_owned().await else {
            return;
        };
        let future = job();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            future.await
        });
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(key = %key, error = %err, "scheduled job failed"),
            Err(join_err) => error!(key = %key, error = %join_err, "scheduled job panicked"),
        }
    }
}

impl ReminderScheduler for TokioReminderScheduler {
    fn schedule_once(&self, key: JobKey, when: DateTime<Utc>, job: JobFn) -> SchedulerResult<()> {
        let (token, generation) = self.inner.register(&key)?;
        let inner = Arc::clone(&self.inner);
        let delay = (when - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::spawn(async move {
            tokio::select! {
                () = time::sleep(delay) => {
                    inner.fire(&key, &job).await;
                }
                () = token.cancelled() => {}
            }
            inner.deregister(&key, generation);
        });
        Ok(())
    }

    fn schedule_recurring(&self, key: JobKey, every: Duration, job: JobFn) -> SchedulerResult<()> {
        let (token, generation) = self.inner.register(&key)?;
        let inner = Arc::clone(&self.inner);
        let max_instances = self.inner.max_instances;
        tokio::spawn(async move {
            let instances = Arc::new(Semaphore::new(max_instances));
            let mut ticker = time::interval_at(Instant::now() + every, every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match Arc::clone(&instances).try_acquire_owned() {
                            Ok(instance_permit) => {
                                let fire_inner = Arc::clone(&inner);
                                let fire_key = key.clone();
                                let fire_job = Arc::clone(&job);
                                tokio::spawn(async move {
                                    let _instance_permit = instance_permit;
                                    fire_inner.fire(&fire_key, &fire_job).await;
                                });
                            }
                            Err(_) => {
                                warn!(key = %key, "job already running at instance capacity, skipping firing");
                            }
                        }
                    }
                    () = token.cancelled() => break,
                }
            }
            inner.deregister(&key, generation);
        });
        Ok(())
    }

    fn cancel(&self, key: &JobKey) -> bool {
        let removed = self.inner.lock_jobs().remove(key);
        match removed {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::SeqCst);
        let mut jobs = self.inner.lock_jobs();
        for (_, entry) in jobs.drain() {
            entry.token.cancel();
        }
    }
}
