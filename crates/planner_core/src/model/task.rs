//! Deadline task domain model.
//!
//! # Responsibility
//! - Define the canonical scheduling item stored per student.
//! - Provide validation shared by write and read paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `priority_score` is computed by core scoring, never supplied by callers.
//! - A `due_time` earlier than `start_time` is legal (overdue deadline).

use crate::model::timestamp::{self, text_format};
use crate::model::{require_text, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a scheduled task.
pub type TaskId = Uuid;

/// Kind of scheduling item.
///
/// Only deadlines flow through the planner today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Hand-in date for coursework.
    Deadline,
}

impl EventType {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deadline => "DEADLINE",
        }
    }

    /// Parses the stable storage value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DEADLINE" => Some(Self::Deadline),
            _ => None,
        }
    }
}

/// One scheduled item owned by a student and attached to a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub student_id: String,
    pub subject_id: String,
    pub title: String,
    pub event_type: EventType,
    #[serde(with = "text_format")]
    pub start_time: NaiveDateTime,
    #[serde(with = "text_format")]
    pub due_time: NaiveDateTime,
    /// Nominal scale 1..=5.
    pub importance: i64,
    /// `None` only for rows persisted without a score.
    pub priority_score: Option<f64>,
}

impl Task {
    /// Creates a deadline task with a generated stable ID and no score yet.
    pub fn new_deadline(
        student_id: impl Into<String>,
        subject_id: impl Into<String>,
        title: impl Into<String>,
        start_time: NaiveDateTime,
        due_time: NaiveDateTime,
        importance: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: student_id.into(),
            subject_id: subject_id.into(),
            title: title.into(),
            event_type: EventType::Deadline,
            start_time,
            due_time,
            importance,
            priority_score: None,
        }
    }

    /// Checks identity and required text fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text("student_id", &self.student_id)?;
        require_text("subject_id", &self.subject_id)?;
        require_text("title", &self.title)
    }

    /// Returns whether the deadline has passed at `now`.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.due_time <= now
    }

    /// Projects this task into the serialized schedule read model.
    pub fn to_schedule_entry(&self) -> ScheduleEntry {
        ScheduleEntry {
            id: self.id,
            title: self.title.clone(),
            subject_id: self.subject_id.clone(),
            due_time: timestamp::format_timestamp(&self.due_time),
            priority_score: self.priority_score,
        }
    }
}

/// Read model returned by schedule queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: TaskId,
    pub title: String,
    pub subject_id: String,
    /// Formatted as `YYYY-MM-DD HH:MM:SS`.
    pub due_time: String,
    pub priority_score: Option<f64>,
}
