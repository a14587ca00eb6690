//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/delete over canonical `tasks` storage.
//! - Keep SQL and timestamp text encoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Student listings come back earliest-due first, then in insertion order
//!   (`due_time ASC, seq ASC`). The schedule orderer is stable, so this is
//!   the tie-break for equal scores.
//! - Deletion is a hard delete; there is no update path for score or due time.

use crate::model::task::{EventType, Task, TaskId};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    task_id,
    student_id,
    subject_id,
    title,
    event_type,
    start_time,
    due_time,
    importance,
    priority_score
FROM tasks";

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists every task of one student, earliest due time first.
    fn list_tasks_for_student(&self, student_id: &str) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tasks"])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                task_id,
                student_id,
                subject_id,
                title,
                event_type,
                start_time,
                due_time,
                importance,
                priority_score,
                seq
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                (SELECT COALESCE(MAX(seq), 0) + 1 FROM tasks)
            );",
            params![
                task.id.to_string(),
                task.student_id.as_str(),
                task.subject_id.as_str(),
                task.title.as_str(),
                task.event_type.as_str(),
                format_timestamp(&task.start_time),
                format_timestamp(&task.due_time),
                task.importance,
                task.priority_score,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE task_id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks_for_student(&self, student_id: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE student_id = ?1 ORDER BY due_time ASC, seq ASC;"
        ))?;
        let mut rows = stmt.query([student_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE task_id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("task_id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tasks.task_id"))
    })?;

    let event_text: String = row.get("event_type")?;
    let event_type = EventType::parse(&event_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid event type `{event_text}` in tasks.event_type"
        ))
    })?;

    let task = Task {
        id,
        student_id: row.get("student_id")?,
        subject_id: row.get("subject_id")?,
        title: row.get("title")?,
        event_type,
        start_time: parse_time_column(row, "start_time")?,
        due_time: parse_time_column(row, "due_time")?,
        importance: row.get("importance")?,
        priority_score: row.get("priority_score")?,
    };
    task.validate()?;
    Ok(task)
}

fn parse_time_column(row: &Row<'_>, column: &'static str) -> RepoResult<NaiveDateTime> {
    let text: String = row.get(column)?;
    parse_timestamp(&text).map_err(|err| {
        RepoError::InvalidData(format!("invalid timestamp `{text}` in tasks.{column}: {err}"))
    })
}
