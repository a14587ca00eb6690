//! Deadline priority scoring.
//!
//! # Responsibility
//! - Turn (due time, importance, difficulty, reference time) into a score.
//! - Offer a strict entry point returning typed errors and a legacy entry
//!   point that never fails.
//!
//! # Invariants
//! - Overdue deadlines (`due <= now`) always score [`OVERDUE_SCORE`].
//! - Tier boundaries use strict `<` at 24h and 72h.
//! - Results are rounded to two decimal places.
//! - For ratings in 1..=5 the score stays within `0..=1000`.

use crate::model::timestamp::parse_timestamp;
use chrono::{Local, NaiveDateTime, Timelike};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Score assigned to deadlines that are already due.
pub const OVERDUE_SCORE: f64 = 1000.0;
/// Score returned by the legacy entry point when scoring fails.
pub const FALLBACK_SCORE: f64 = 0.0;
/// Lower bound of the nominal importance/difficulty scale.
pub const RATING_MIN: f64 = 1.0;
/// Upper bound of the nominal importance/difficulty scale.
pub const RATING_MAX: f64 = 5.0;

const FINAL_DAY_HOURS: f64 = 24.0;
const SHORT_HORIZON_HOURS: f64 = 72.0;
const FLAT_URGENCY: f64 = 10.0;
const RATING_TO_PERCENT: f64 = 20.0;
const URGENCY_WEIGHT: f64 = 0.5;
const IMPORTANCE_WEIGHT: f64 = 0.3;
const DIFFICULTY_WEIGHT: f64 = 0.2;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub type ScoreResult<T> = Result<T, ScoreError>;

/// Scoring failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Due time text is not `YYYY-MM-DD HH:MM:SS` or not a calendar instant.
    InvalidDueTime { value: String, reason: String },
    /// An input or the combined result is NaN/infinite.
    NonFinite { field: &'static str },
    /// A rating is outside `1..=5` under [`RangePolicy::Reject`].
    OutOfRange { field: &'static str, value: f64 },
}

impl ScoreError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDueTime { .. } => "invalid_due_time",
            Self::NonFinite { .. } => "non_finite",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDueTime { value, reason } => {
                write!(f, "invalid due time `{value}`: {reason}")
            }
            Self::NonFinite { field } => write!(f, "`{field}` is not a finite number"),
            Self::OutOfRange { field, value } => write!(
                f,
                "`{field}` = {value} is outside {RATING_MIN}..={RATING_MAX}"
            ),
        }
    }
}

impl Error for ScoreError {}

/// Fractional hours from `now` until `due`; negative once overdue.
pub fn hours_remaining(due: NaiveDateTime, now: NaiveDateTime) -> f64 {
    (due - now).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Time-decay sub-score for the given remaining hours.
///
/// - `< 24h`: `100 - 2h`
/// - `24h..72h`: `50 - h/3`
/// - `>= 72h`: flat `10`
///
/// Never negative.
pub fn urgency(hours_remaining: f64) -> f64 {
    let raw = if hours_remaining < FINAL_DAY_HOURS {
        100.0 - hours_remaining * 2.0
    } else if hours_remaining < SHORT_HORIZON_HOURS {
        50.0 - hours_remaining / 3.0
    } else {
        FLAT_URGENCY
    };
    raw.max(0.0)
}

/// Strict scorer over an already parsed due time.
///
/// Ratings are taken as given; see [`RangePolicy`] for boundary checks.
///
/// # Errors
/// - [`ScoreError::NonFinite`] when a rating or the combined score is not
///   finite.
pub fn priority_score(
    due: NaiveDateTime,
    importance: f64,
    difficulty: f64,
    now: NaiveDateTime,
) -> ScoreResult<f64> {
    let hours = hours_remaining(due, now);
    if hours <= 0.0 {
        return Ok(OVERDUE_SCORE);
    }

    if !importance.is_finite() {
        return Err(ScoreError::NonFinite { field: "importance" });
    }
    if !difficulty.is_finite() {
        return Err(ScoreError::NonFinite { field: "difficulty" });
    }

    let combined = urgency(hours) * URGENCY_WEIGHT
        + importance * RATING_TO_PERCENT * IMPORTANCE_WEIGHT
        + difficulty * RATING_TO_PERCENT * DIFFICULTY_WEIGHT;
    if !combined.is_finite() {
        return Err(ScoreError::NonFinite { field: "score" });
    }

    Ok(round_to_cents(combined))
}

/// Strict scorer over due time text in `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
/// - [`ScoreError::InvalidDueTime`] when `due_time` does not parse.
/// - Everything [`priority_score`] returns.
pub fn try_score(
    due_time: &str,
    importance: f64,
    difficulty: f64,
    now: NaiveDateTime,
) -> ScoreResult<f64> {
    let due = parse_due_time(due_time)?;
    priority_score(due, importance, difficulty, now)
}

/// Legacy scorer that never fails.
///
/// Any scoring error is logged and mapped to [`FALLBACK_SCORE`], which ranks
/// a malformed deadline *last*. Prefer [`try_score`] for new callers.
pub fn score(due_time: &str, importance: f64, difficulty: f64, now: NaiveDateTime) -> f64 {
    match try_score(due_time, importance, difficulty, now) {
        Ok(value) => value,
        Err(err) => {
            log_fallback(&err);
            FALLBACK_SCORE
        }
    }
}

/// [`score`] against the current local wall-clock time.
pub fn score_now(due_time: &str, importance: f64, difficulty: f64) -> f64 {
    score(due_time, importance, difficulty, local_now())
}

/// Parses a due time, mapping failures into [`ScoreError::InvalidDueTime`].
pub fn parse_due_time(value: &str) -> ScoreResult<NaiveDateTime> {
    parse_timestamp(value).map_err(|err| ScoreError::InvalidDueTime {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

/// Current local wall-clock time, second precision.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Treatment of importance/difficulty outside `1..=5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Scale linearly, whatever the value.
    Unchecked,
    /// Clamp into `1..=5` before scaling.
    Clamp,
    /// Refuse with [`ScoreError::OutOfRange`].
    #[default]
    Reject,
}

impl RangePolicy {
    /// Applies this policy to one rating.
    pub fn apply(self, field: &'static str, value: f64) -> ScoreResult<f64> {
        match self {
            Self::Unchecked => Ok(value),
            Self::Clamp => Ok(value.clamp(RATING_MIN, RATING_MAX)),
            Self::Reject => {
                if (RATING_MIN..=RATING_MAX).contains(&value) {
                    Ok(value)
                } else {
                    Err(ScoreError::OutOfRange { field, value })
                }
            }
        }
    }
}

/// Scoring behaviour selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub range_policy: RangePolicy,
    /// Degrade every scoring error to [`FALLBACK_SCORE`] instead of
    /// returning it.
    pub legacy_fallback: bool,
}

impl ScoringPolicy {
    /// Unchecked ratings, errors degrade to [`FALLBACK_SCORE`].
    pub fn legacy() -> Self {
        Self {
            range_policy: RangePolicy::Unchecked,
            legacy_fallback: true,
        }
    }
}

/// Policy-aware scorer used by the service layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    policy: ScoringPolicy,
}

impl Scorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Scores a parsed due time under the configured policy.
    ///
    /// Range checks run before the overdue short-circuit, so `Reject` refuses
    /// bad ratings even for overdue deadlines.
    pub fn score(
        &self,
        due: NaiveDateTime,
        importance: f64,
        difficulty: f64,
        now: NaiveDateTime,
    ) -> ScoreResult<f64> {
        let result = self.checked_ratings(importance, difficulty).and_then(
            |(importance, difficulty)| priority_score(due, importance, difficulty, now),
        );
        self.settle(result)
    }

    /// Scores due time text under the configured policy.
    pub fn score_text(
        &self,
        due_time: &str,
        importance: f64,
        difficulty: f64,
        now: NaiveDateTime,
    ) -> ScoreResult<f64> {
        let result = parse_due_time(due_time).and_then(|due| {
            let (importance, difficulty) = self.checked_ratings(importance, difficulty)?;
            priority_score(due, importance, difficulty, now)
        });
        self.settle(result)
    }

    fn checked_ratings(&self, importance: f64, difficulty: f64) -> ScoreResult<(f64, f64)> {
        let range = self.policy.range_policy;
        Ok((
            range.apply("importance", importance)?,
            range.apply("difficulty", difficulty)?,
        ))
    }

    fn settle(&self, result: ScoreResult<f64>) -> ScoreResult<f64> {
        match result {
            Err(err) if self.policy.legacy_fallback => {
                log_fallback(&err);
                Ok(FALLBACK_SCORE)
            }
            other => other,
        }
    }
}

// Rounds the exact binary value (ties to even) rather than `value * 100`,
// which can land on a spurious `.5` after the multiplication.
fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

fn log_fallback(err: &ScoreError) {
    warn!(
        "event=priority_score module=scoring status=fallback score={} error_code={} error={}",
        FALLBACK_SCORE,
        err.code(),
        err
    );
}
