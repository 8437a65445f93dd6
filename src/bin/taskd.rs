//! Ingests extracted action items and runs their reminder schedule.
//!
//! Usage:
//!
//! ```text
//! taskd <action-items.json> [--db <path>] [--config <path>] [--meeting <id>] [--transcript <id>]
//! ```
//!
//! The JSON payload is an array of action items as emitted by the
//! extraction collaborator:
//!
//! ```json
//! [
//!   {
//!     "task": "Review budget proposal",
//!     "assignee": "alice",
//!     "priority": "high",
//!     "suggested_deadline": "2024-01-18"
//!   }
//! ]
//! ```
//!
//! Without `--db` the tasks live in memory for the lifetime of the
//! process; with it they persist to the given `SQLite` file. The daemon
//! keeps running so reminder jobs can fire, and shuts the scheduler down
//! cleanly on Ctrl-C.

use std::env;
use std::sync::Arc;

use mockable::DefaultClock;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use traction::config::{ReminderConfig, SchedulerConfig};
use traction::scheduler::adapters::TokioReminderScheduler;
use traction::scheduler::ports::ReminderScheduler;
use traction::task::adapters::memory::InMemoryTaskRepository;
use traction::task::adapters::sqlite::SqliteTaskRepository;
use traction::task::domain::{ActionItem, MeetingId, TranscriptId};
use traction::task::ports::TaskRepository;
use traction::task::services::TaskFacade;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum DaemonError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read action items from '{path}': {source}")]
    PayloadRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse action items: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("failed to read config from '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
}

/// On-disk daemon configuration; both sections are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DaemonConfig {
    scheduler: SchedulerConfig,
    reminders: ReminderConfig,
}

#[derive(Debug)]
struct DaemonArgs {
    items_path: String,
    db_path: Option<String>,
    config_path: Option<String>,
    meeting_id: Option<MeetingId>,
    transcript_id: Option<TranscriptId>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args(env::args())?;
    let items = load_action_items(&args.items_path)?;
    let config = match args.config_path {
        Some(ref path) => load_config(path)?,
        None => DaemonConfig::default(),
    };

    match args.db_path {
        Some(ref path) => {
            let repository = Arc::new(SqliteTaskRepository::open(path)?);
            info!(db = %path, "using sqlite task store");
            run(repository, config, args, items).await
        }
        None => {
            let repository = Arc::new(InMemoryTaskRepository::new());
            info!("using in-memory task store");
            run(repository, config, args, items).await
        }
    }
}

async fn run<R>(
    repository: Arc<R>,
    config: DaemonConfig,
    args: DaemonArgs,
    items: Vec<ActionItem>,
) -> Result<(), BoxError>
where
    R: TaskRepository + 'static,
{
    let scheduler = Arc::new(TokioReminderScheduler::new(config.scheduler));
    let facade = TaskFacade::new(
        repository,
        Arc::new(DefaultClock),
        Arc::clone(&scheduler) as Arc<dyn ReminderScheduler>,
        config.reminders,
    );

    let created = facade
        .create_tasks_from_action_items(&items, args.meeting_id, args.transcript_id)
        .await;
    info!(created = created.len(), "action items ingested");

    let snapshot = facade.get_task_statistics().await?;
    info!(
        total = snapshot.total,
        pending = snapshot.pending,
        in_progress = snapshot.in_progress,
        completed = snapshot.completed,
        overdue = snapshot.overdue,
        upcoming = snapshot.upcoming,
        "task store snapshot",
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down reminder scheduler");
    scheduler.shutdown();
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<DaemonArgs, DaemonError> {
    let _program = args.next();
    let mut items_path = None;
    let mut db_path = None;
    let mut config_path = None;
    let mut meeting_id = None;
    let mut transcript_id = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(expect_value(&mut args, "--db")?),
            "--config" => config_path = Some(expect_value(&mut args, "--config")?),
            "--meeting" => {
                meeting_id = Some(MeetingId::new(expect_value(&mut args, "--meeting")?));
            }
            "--transcript" => {
                transcript_id = Some(TranscriptId::new(expect_value(&mut args, "--transcript")?));
            }
            other if other.starts_with("--") => {
                return Err(DaemonError::InvalidArgs(format!("unknown flag '{other}'")));
            }
            _ => {
                if items_path.is_some() {
                    return Err(DaemonError::InvalidArgs(format!(
                        "unexpected extra argument: {arg}"
                    )));
                }
                items_path = Some(arg);
            }
        }
    }

    let items_path = items_path
        .ok_or_else(|| DaemonError::InvalidArgs("missing action items path".into()))?;
    Ok(DaemonArgs {
        items_path,
        db_path,
        config_path,
        meeting_id,
        transcript_id,
    })
}

fn expect_value(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, DaemonError> {
    args.next()
        .ok_or_else(|| DaemonError::InvalidArgs(format!("{flag} requires a value")))
}

fn load_config(path: &str) -> Result<DaemonConfig, DaemonError> {
    let bytes = std::fs::read(path).map_err(|source| DaemonError::ConfigRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(DaemonError::ConfigParse)
}

fn load_action_items(path: &str) -> Result<Vec<ActionItem>, DaemonError> {
    let bytes = std::fs::read(path).map_err(|source| DaemonError::PayloadRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(DaemonError::PayloadParse)
}
