//! Core domain logic for the student deadline planner.
//! This crate is the single source of truth for scoring and ordering rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scoring;
pub mod service;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::directory::{Student, Subject, DEFAULT_SUBJECT_DIFFICULTY};
pub use model::task::{EventType, ScheduleEntry, Task, TaskId};
pub use model::timestamp::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};
pub use model::ValidationError;
pub use repo::directory_repo::{DirectoryRepository, Ensured, SqliteDirectoryRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use scoring::priority::{
    priority_score, score, score_now, try_score, RangePolicy, ScoreError, ScoreResult, Scorer,
    ScoringPolicy, FALLBACK_SCORE, OVERDUE_SCORE,
};
pub use scoring::schedule::{order, Prioritized};
pub use service::deadline_service::{
    CreateDeadlineRequest, CreatedDeadline, DeadlineService, DeadlineServiceError,
    ServiceResult, StudentSchedule,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
