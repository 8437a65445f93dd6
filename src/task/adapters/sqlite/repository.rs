//! SQLite implementation of the task repository port.
//!
//! Column names follow the de facto task schema, and deadline columns
//! store `YYYY-MM-DD` text so lexicographic comparison in SQL matches
//! calendar-date comparison in the domain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::task::{
    domain::{
        DeadlineDate, MeetingId, PersistedTaskData, Priority, Task, TaskId, TaskPatch,
        TaskStatus, TranscriptId,
    },
    ports::{TaskFilter, TaskOrdering, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    task TEXT NOT NULL,
    assignee TEXT NOT NULL,
    priority TEXT NOT NULL,
    context TEXT NOT NULL,
    status TEXT NOT NULL,
    meeting_id TEXT,
    transcript_id TEXT,
    suggested_deadline TEXT,
    actual_deadline TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const COLUMNS: &str = "id, task, assignee, priority, context, status, meeting_id, \
     transcript_id, suggested_deadline, actual_deadline, created_at, updated_at";

/// Task repository backed by an embedded SQLite database.
#[derive(Debug)]
pub struct SqliteTaskRepository {
    conn: Arc<Mutex<Connection>>,
}

/// Raw row contents before domain parsing.
struct TaskRow {
    id: String,
    description: String,
    assignee: String,
    priority: String,
    context: String,
    status: String,
    meeting_id: Option<String>,
    transcript_id: Option<String>,
    suggested_deadline: Option<String>,
    actual_deadline: String,
    created_at: String,
    updated_at: String,
}

impl SqliteTaskRepository {
    /// Opens (or creates) a task database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the file cannot be
    /// opened or the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> TaskRepositoryResult<Self> {
        let conn = Connection::open(path).map_err(TaskRepositoryError::unavailable)?;
        Self::with_connection(conn)
    }

    /// Opens a fresh private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Unavailable`] when the schema cannot
    /// be applied.
    pub fn open_in_memory() -> TaskRepositoryResult<Self> {
        let conn = Connection::open_in_memory().map_err(TaskRepositoryError::unavailable)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> TaskRepositoryResult<Self> {
        conn.execute(SCHEMA, [])
            .map_err(TaskRepositoryError::unavailable)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> TaskRepositoryResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|err| {
            TaskRepositoryError::unavailable(std::io::Error::other(err.to_string()))
        })
    }
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get("id")?,
        description: row.get("task")?,
        assignee: row.get("assignee")?,
        priority: row.get("priority")?,
        context: row.get("context")?,
        status: row.get("status")?,
        meeting_id: row.get("meeting_id")?,
        transcript_id: row.get("transcript_id")?,
        suggested_deadline: row.get("suggested_deadline")?,
        actual_deadline: row.get("actual_deadline")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Converts a raw row into the domain aggregate.
///
/// Any parse failure means the row was written outside this adapter and
/// is reported as a store-level failure rather than silently skipped.
fn raw_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let id = row
        .id
        .parse()
        .map(TaskId::from_uuid)
        .map_err(TaskRepositoryError::unavailable)?;
    let priority =
        Priority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::unavailable)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::unavailable)?;
    let suggested_deadline = row
        .suggested_deadline
        .as_deref()
        .map(DeadlineDate::parse)
        .transpose()
        .map_err(TaskRepositoryError::unavailable)?;
    let actual_deadline =
        DeadlineDate::parse(&row.actual_deadline).map_err(TaskRepositoryError::unavailable)?;
    let created_at = parse_timestamp(&row.created_at)?;
    let updated_at = parse_timestamp(&row.updated_at)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        description: row.description,
        assignee: row.assignee,
        priority,
        context: row.context,
        status,
        meeting_id: row.meeting_id.map(MeetingId::new),
        transcript_id: row.transcript_id.map(TranscriptId::new),
        suggested_deadline,
        actual_deadline,
        created_at,
        updated_at,
    }))
}

fn parse_timestamp(raw: &str) -> TaskRepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(TaskRepositoryError::unavailable)
}

/// Translates the filter into a WHERE clause plus bound parameters.
fn filter_to_sql(filter: &TaskFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(status) = filter.status {
        clauses.push("status = ?".to_owned());
        values.push(Box::new(status.as_str().to_owned()));
    }
    if filter.open_only {
        clauses.push("status IN ('pending', 'in_progress')".to_owned());
    }
    if let Some(ref assignee) = filter.assignee {
        clauses.push("assignee = ?".to_owned());
        values.push(Box::new(assignee.clone()));
    }
    if let Some(priority) = filter.priority {
        clauses.push("priority = ?".to_owned());
        values.push(Box::new(priority.as_str().to_owned()));
    }
    if let Some(ref meeting_id) = filter.meeting_id {
        clauses.push("meeting_id = ?".to_owned());
        values.push(Box::new(meeting_id.as_str().to_owned()));
    }
    if let Some(ref transcript_id) = filter.transcript_id {
        clauses.push("transcript_id = ?".to_owned());
        values.push(Box::new(transcript_id.as_str().to_owned()));
    }
    if let Some(before) = filter.deadline_before {
        clauses.push("actual_deadline < ?".to_owned());
        values.push(Box::new(before.to_string()));
    }
    if let Some(from) = filter.deadline_from {
        clauses.push("actual_deadline >= ?".to_owned());
        values.push(Box::new(from.to_string()));
    }
    if let Some(to) = filter.deadline_to {
        clauses.push("actual_deadline <= ?".to_owned());
        values.push(Box::new(to.to_string()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_clause, values)
}

const fn order_to_sql(order: TaskOrdering) -> &'static str {
    match order {
        TaskOrdering::CreatedAtDesc => " ORDER BY created_at DESC, id ASC",
        TaskOrdering::DeadlineAsc => " ORDER BY actual_deadline ASC, created_at ASC",
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let conn = self.lock()?;
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM tasks WHERE id = ?1",
                params![task.id().to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(TaskRepositoryError::unavailable)?;
        if existing.is_some() {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        conn.execute(
            "INSERT INTO tasks (id, task, assignee, priority, context, status, meeting_id, \
             transcript_id, suggested_deadline, actual_deadline, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                task.id().to_string(),
                task.description(),
                task.assignee(),
                task.priority().as_str(),
                task.context(),
                task.status().as_str(),
                task.meeting_id().map(MeetingId::as_str),
                task.transcript_id().map(TranscriptId::as_str),
                task.suggested_deadline().map(|d| d.to_string()),
                task.actual_deadline().to_string(),
                task.created_at().to_rfc3339(),
                task.updated_at().to_rfc3339(),
            ],
        )
        .map_err(TaskRepositoryError::unavailable)?;
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                params![id.to_string()],
                row_to_raw,
            )
            .optional()
            .map_err(TaskRepositoryError::unavailable)?;
        row.map(raw_to_task).transpose()
    }

    async fn find(
        &self,
        filter: &TaskFilter,
        order: TaskOrdering,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let conn = self.lock()?;
        let (where_clause, values) = filter_to_sql(filter);
        let sql = format!(
            "SELECT {COLUMNS} FROM tasks{where_clause}{}",
            order_to_sql(order)
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(TaskRepositoryError::unavailable)?;
        let params: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        let rows = stmt
            .query_map(params.as_slice(), row_to_raw)
            .map_err(TaskRepositoryError::unavailable)?;

        let mut tasks = Vec::new();
        for row in rows {
            let raw = row.map_err(TaskRepositoryError::unavailable)?;
            tasks.push(raw_to_task(raw)?);
        }
        Ok(tasks)
    }

    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool> {
        let conn = self.lock()?;
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref description) = patch.description {
            let trimmed = description.trim();
            if !trimmed.is_empty() {
                sets.push("task = ?".to_owned());
                values.push(Box::new(trimmed.to_owned()));
            }
        }
        if let Some(ref assignee) = patch.assignee {
            sets.push("assignee = ?".to_owned());
            values.push(Box::new(assignee.trim().to_owned()));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?".to_owned());
            values.push(Box::new(priority.as_str().to_owned()));
        }
        if let Some(ref context) = patch.context {
            sets.push("context = ?".to_owned());
            values.push(Box::new(context.trim().to_owned()));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?".to_owned());
            values.push(Box::new(status.as_str().to_owned()));
        }
        if let Some(deadline) = patch.actual_deadline {
            sets.push("actual_deadline = ?".to_owned());
            values.push(Box::new(deadline.to_string()));
        }
        sets.push("updated_at = ?".to_owned());
        values.push(Box::new(updated_at.to_rfc3339()));
        values.push(Box::new(id.to_string()));

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = ?",
            sets.join(", ")
        );
        let params: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        let modified = conn
            .execute(&sql, params.as_slice())
            .map_err(TaskRepositoryError::unavailable)?;
        Ok(modified > 0)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])
            .map_err(TaskRepositoryError::unavailable)?;
        Ok(deleted > 0)
    }

    async fn count(&self, filter: &TaskFilter) -> TaskRepositoryResult<u64> {
        let conn = self.lock()?;
        let (where_clause, values) = filter_to_sql(filter);
        let sql = format!("SELECT COUNT(*) FROM tasks{where_clause}");
        let params: Vec<&dyn ToSql> = values.iter().map(AsRef::as_ref).collect();
        conn.query_row(&sql, params.as_slice(), |row| row.get::<_, u64>(0))
            .map_err(TaskRepositoryError::unavailable)
    }
}
