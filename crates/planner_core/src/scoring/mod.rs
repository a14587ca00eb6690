//! Priority scoring and schedule ordering.
//!
//! # Responsibility
//! - Compute a deadline's priority score once, at creation time.
//! - Order stored tasks by that score on read.
//!
//! # Invariants
//! - Both halves are pure apart from fallback logging.
//! - Callers pass the reference time explicitly; nothing here caches "now".

pub mod priority;
pub mod schedule;
