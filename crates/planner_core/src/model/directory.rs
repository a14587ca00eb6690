//! Student and subject records referenced by tasks.
//!
//! Both records are keyed by caller-supplied ids and may be auto-created
//! the first time a task references them.

use crate::model::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Difficulty assigned to subjects created without an explicit rating.
pub const DEFAULT_SUBJECT_DIFFICULTY: f64 = 3.0;

/// Learner owning a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub full_name: String,
}

impl Student {
    /// Placeholder record used when a task references an unknown student.
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        let full_name = format!("Student {id}");
        Self { id, full_name }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("student_id", &self.id)
    }
}

/// Course a task belongs to, with its intrinsic difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Nominal scale 1.0..=5.0.
    pub difficulty: f64,
}

impl Subject {
    /// Placeholder record used when a task references an unknown subject.
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = format!("Subject {id}");
        Self {
            id,
            name,
            difficulty: DEFAULT_SUBJECT_DIFFICULTY,
        }
    }

    /// Checks id/name and that difficulty is a usable number.
    ///
    /// The 1..=5 scale is not enforced here; scoring policy owns that.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("subject_id", &self.id)?;
        require_text("name", &self.name)?;
        if !self.difficulty.is_finite() {
            return Err(ValidationError::NonFiniteDifficulty);
        }
        Ok(())
    }
}
