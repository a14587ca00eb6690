//! Deadline use-case service.
//!
//! # Responsibility
//! - Turn deadline submissions into scored, persisted tasks.
//! - Serve a student's schedule ordered by priority.
//! - Keep CLI/transport layers decoupled from storage and scoring details.
//!
//! # Invariants
//! - A task's score is computed once, at creation, and never recomputed.
//! - Validation, parsing and scoring all run before the first write, so a
//!   rejected submission leaves no student, subject or task behind.
//! - The writes themselves are not atomic here; callers that need the
//!   auto-created directory rows to roll back with a failed task insert run
//!   `create_deadline` inside a transaction on the shared connection.
//! - Unknown students/subjects are auto-created on the first accepted
//!   submission that references them.

use crate::model::directory::{Subject, DEFAULT_SUBJECT_DIFFICULTY};
use crate::model::task::{ScheduleEntry, Task, TaskId};
use crate::repo::directory_repo::DirectoryRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::scoring::priority::{local_now, parse_due_time, ScoreError, Scorer};
use crate::scoring::schedule::order;
use chrono::NaiveDateTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for deadline use-cases.
#[derive(Debug)]
pub enum DeadlineServiceError {
    /// Required request field is absent or blank.
    MissingField(&'static str),
    /// Due time does not parse; a task without a due time cannot be stored.
    InvalidDueTime(ScoreError),
    /// Scorer refused the inputs under the active policy.
    Scoring(ScoreError),
    /// Target task does not exist.
    DeadlineNotFound(TaskId),
    /// Subject difficulty is not finite or violates the range policy.
    InvalidDifficulty(f64),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for DeadlineServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidDueTime(err) => write!(f, "{err}"),
            Self::Scoring(err) => write!(f, "priority scoring failed: {err}"),
            Self::DeadlineNotFound(id) => write!(f, "deadline not found: {id}"),
            Self::InvalidDifficulty(value) => write!(f, "invalid subject difficulty: {value}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DeadlineServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDueTime(err) | Self::Scoring(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DeadlineServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::DeadlineNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, DeadlineServiceError>;

/// Deadline submission as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeadlineRequest {
    pub student_id: String,
    pub subject_id: String,
    pub title: String,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub due_time: String,
    /// Required; `None` models a submission that left it out.
    pub importance: Option<i64>,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDeadline {
    pub task_id: TaskId,
    pub priority_score: f64,
}

/// One student's tasks, highest priority first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSchedule {
    pub student_id: String,
    pub items: Vec<ScheduleEntry>,
}

/// Deadline service facade over task and directory repositories.
pub struct DeadlineService<T: TaskRepository, D: DirectoryRepository> {
    tasks: T,
    directory: D,
    scorer: Scorer,
}

impl<T: TaskRepository, D: DirectoryRepository> DeadlineService<T, D> {
    pub fn new(tasks: T, directory: D, scorer: Scorer) -> Self {
        Self {
            tasks,
            directory,
            scorer,
        }
    }

    /// Creates a deadline scored against the current local time.
    pub fn create_deadline(&self, request: &CreateDeadlineRequest) -> ServiceResult<CreatedDeadline> {
        self.create_deadline_at(request, local_now())
    }

    /// Creates a deadline scored against `now`, which also becomes its
    /// start time.
    ///
    /// # Errors
    /// - `MissingField` for blank student/subject/title/due time or absent
    ///   importance.
    /// - `InvalidDueTime` when the due time does not parse.
    /// - `Scoring` when the scorer policy rejects the ratings.
    pub fn create_deadline_at(
        &self,
        request: &CreateDeadlineRequest,
        now: NaiveDateTime,
    ) -> ServiceResult<CreatedDeadline> {
        let student_id = required("student_id", &request.student_id)?;
        let subject_id = required("subject_id", &request.subject_id)?;
        let title = required("title", &request.title)?;
        let due_text = required("due_time", &request.due_time)?;
        let importance = request
            .importance
            .ok_or(DeadlineServiceError::MissingField("importance"))?;

        let due = parse_due_time(due_text).map_err(|err| {
            warn!(
                "event=deadline_create module=service status=rejected error_code={} student_id={}",
                err.code(),
                student_id
            );
            DeadlineServiceError::InvalidDueTime(err)
        })?;

        let difficulty = self
            .directory
            .get_subject(subject_id)?
            .map_or(DEFAULT_SUBJECT_DIFFICULTY, |subject| subject.difficulty);
        let score = self
            .scorer
            .score(due, importance as f64, difficulty, now)
            .map_err(|err| {
                warn!(
                    "event=deadline_create module=service status=rejected error_code={} student_id={}",
                    err.code(),
                    student_id
                );
                DeadlineServiceError::Scoring(err)
            })?;

        if self.directory.ensure_student(student_id)?.created {
            info!("event=student_autocreate module=service status=ok student_id={student_id}");
        }
        if self.directory.ensure_subject(subject_id)?.created {
            info!(
                "event=subject_autocreate module=service status=ok subject_id={subject_id} difficulty={DEFAULT_SUBJECT_DIFFICULTY}"
            );
        }

        let mut task = Task::new_deadline(student_id, subject_id, title, now, due, importance);
        task.priority_score = Some(score);
        let task_id = self.tasks.create_task(&task)?;

        info!(
            "event=deadline_create module=service status=ok task_id={task_id} student_id={student_id} priority_score={score:.2}"
        );
        Ok(CreatedDeadline {
            task_id,
            priority_score: score,
        })
    }

    /// Returns every task of `student_id`, highest priority first.
    ///
    /// Equal scores come out earliest-due first, then in submission order.
    /// Scores are re-surfaced as stored.
    pub fn optimized_schedule(&self, student_id: &str) -> ServiceResult<StudentSchedule> {
        let student_id = required("student_id", student_id)?;
        let tasks = self.tasks.list_tasks_for_student(student_id)?;
        let items = order(tasks)
            .iter()
            .map(Task::to_schedule_entry)
            .collect::<Vec<_>>();

        info!(
            "event=schedule_optimize module=service status=ok student_id={student_id} items={}",
            items.len()
        );
        Ok(StudentSchedule {
            student_id: student_id.to_string(),
            items,
        })
    }

    /// Gets one deadline by stable ID.
    pub fn get_deadline(&self, id: TaskId) -> ServiceResult<Task> {
        self.tasks
            .get_task(id)?
            .ok_or(DeadlineServiceError::DeadlineNotFound(id))
    }

    /// Hard-deletes one deadline.
    pub fn delete_deadline(&self, id: TaskId) -> ServiceResult<()> {
        self.tasks.delete_task(id)?;
        info!("event=deadline_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Registers or re-rates a subject.
    ///
    /// Difficulty passes through the scorer's range policy; a blank name
    /// falls back to the placeholder name. Existing task scores are left as
    /// they were computed.
    pub fn register_subject(
        &self,
        id: &str,
        name: Option<&str>,
        difficulty: f64,
    ) -> ServiceResult<Subject> {
        let id = required("subject_id", id)?;
        if !difficulty.is_finite() {
            return Err(DeadlineServiceError::InvalidDifficulty(difficulty));
        }
        let difficulty = self
            .scorer
            .policy()
            .range_policy
            .apply("difficulty", difficulty)
            .map_err(|_| DeadlineServiceError::InvalidDifficulty(difficulty))?;

        let mut subject = Subject::placeholder(id);
        if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
            subject.name = name.to_string();
        }
        subject.difficulty = difficulty;
        self.directory.upsert_subject(&subject)?;

        info!("event=subject_register module=service status=ok subject_id={id} difficulty={difficulty}");
        Ok(subject)
    }

    /// Lists known subjects ordered by id.
    pub fn list_subjects(&self) -> ServiceResult<Vec<Subject>> {
        Ok(self.directory.list_subjects()?)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> ServiceResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeadlineServiceError::MissingField(field));
    }
    Ok(trimmed)
}
