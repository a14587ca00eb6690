//! Schedule ordering by priority score.
//!
//! # Invariants
//! - Output is sorted by score descending.
//! - Equal scores keep their input order (stable sort).
//! - Missing or NaN scores rank as `0` without touching the stored value.

use crate::model::task::{ScheduleEntry, Task};
use std::cmp::Ordering;

/// Anything that carries an optional priority score.
pub trait Prioritized {
    fn priority_score(&self) -> Option<f64>;
}

impl Prioritized for Task {
    fn priority_score(&self) -> Option<f64> {
        self.priority_score
    }
}

impl Prioritized for ScheduleEntry {
    fn priority_score(&self) -> Option<f64> {
        self.priority_score
    }
}

impl<T: Prioritized> Prioritized for &T {
    fn priority_score(&self) -> Option<f64> {
        (*self).priority_score()
    }
}

/// Orders items by descending priority, highest first.
///
/// Empty input yields empty output. Only positions change.
pub fn order<T: Prioritized>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(|left, right| {
        ordering_key(right)
            .partial_cmp(&ordering_key(left))
            .unwrap_or(Ordering::Equal)
    });
    items
}

fn ordering_key(item: &impl Prioritized) -> f64 {
    match item.priority_score() {
        Some(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::{order, Prioritized};

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, Option<f64>);

    impl Prioritized for Item {
        fn priority_score(&self) -> Option<f64> {
            self.1
        }
    }

    fn names(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|item| item.0).collect()
    }

    #[test]
    fn nan_ranks_like_missing_score() {
        let ordered = order(vec![
            Item("nan", Some(f64::NAN)),
            Item("low", Some(-1.0)),
            Item("high", Some(2.0)),
            Item("none", None),
        ]);
        assert_eq!(names(&ordered), vec!["high", "nan", "none", "low"]);
    }

    #[test]
    fn orders_borrowed_items() {
        let items = [Item("a", Some(1.0)), Item("b", Some(4.0))];
        let ordered = order(items.iter().collect::<Vec<_>>());
        assert_eq!(ordered[0].0, "b");
        assert_eq!(ordered[1].0, "a");
    }
}
