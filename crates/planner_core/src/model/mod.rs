//! Domain model for deadline planning.
//!
//! # Responsibility
//! - Define canonical data structures used by scoring and persistence.
//! - Own the timestamp text format shared by storage and wire payloads.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Students and subjects are keyed by caller-supplied, non-blank ids.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod directory;
pub mod task;
pub mod timestamp;

/// Validation failures shared by tasks, students and subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NilId,
    BlankField(&'static str),
    NonFiniteDifficulty,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::NonFiniteDifficulty => write!(f, "subject difficulty must be a finite number"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
