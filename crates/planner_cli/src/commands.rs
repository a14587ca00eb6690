//! Command handlers over the core deadline service.

use crate::cli::Command;
use anyhow::{Context, Result};
use planner_core::scoring::priority::local_now;
use planner_core::{
    parse_timestamp, CreateDeadlineRequest, DeadlineService, PlannerConfig, Scorer,
    SqliteDirectoryRepository, SqliteTaskRepository,
};
use rusqlite::Connection;
use serde_json::{json, Value};

/// Runs one command and returns its JSON result.
pub fn run(command: &Command, config: &PlannerConfig, conn: &Connection) -> Result<Value> {
    let service = || -> Result<_> {
        Ok(DeadlineService::new(
            SqliteTaskRepository::try_new(conn)?,
            SqliteDirectoryRepository::try_new(conn)?,
            Scorer::new(config.scoring),
        ))
    };

    let value = match command {
        Command::Create {
            student,
            subject,
            title,
            due,
            importance,
        } => {
            let request = CreateDeadlineRequest {
                student_id: student.clone(),
                subject_id: subject.clone(),
                title: title.clone(),
                due_time: due.clone(),
                importance: Some(*importance),
            };
            // Directory auto-creation and the task insert commit together.
            let tx = conn.unchecked_transaction()?;
            let created = service()?.create_deadline(&request)?;
            tx.commit()?;
            json!({
                "status": "success",
                "taskId": created.task_id,
                "priorityScore": format!("{:.2}", created.priority_score),
            })
        }
        Command::Schedule { student } => {
            serde_json::to_value(service()?.optimized_schedule(student)?)?
        }
        Command::Show { id } => serde_json::to_value(service()?.get_deadline(*id)?)?,
        Command::Delete { id } => {
            service()?.delete_deadline(*id)?;
            json!({ "status": "success", "deleted": id })
        }
        Command::Subject {
            id,
            name,
            difficulty,
        } => serde_json::to_value(service()?.register_subject(
            id,
            name.as_deref(),
            *difficulty,
        )?)?,
        Command::Subjects => serde_json::to_value(service()?.list_subjects()?)?,
        Command::Score {
            due,
            importance,
            difficulty,
            now,
        } => score_only(config, due, *importance, *difficulty, now.as_deref())?,
    };
    Ok(value)
}

fn score_only(
    config: &PlannerConfig,
    due: &str,
    importance: f64,
    difficulty: f64,
    now: Option<&str>,
) -> Result<Value> {
    let now = match now {
        Some(text) => parse_timestamp(text).with_context(|| format!("invalid --now `{text}`"))?,
        None => local_now(),
    };

    let value = Scorer::new(config.scoring).score_text(due, importance, difficulty, now)?;
    Ok(json!({ "priorityScore": value }))
}
