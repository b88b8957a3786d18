//! Eligibility filter
//!
//! Splits a candidate set into posts that are ready for their transition and
//! posts that are not yet old enough. A post is ready only when its elapsed
//! days are strictly greater than the threshold. Posts that were never
//! published have no age and always stay pending.

use std::collections::HashSet;
use std::fmt;

use ghost_admin::ContentItem;

use crate::clock::Clock;
use crate::elapsed::elapsed_days;

/// Decision taken for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ready,
    /// Days left before the post becomes ready (at least 1)
    Pending { days_to_go: i64 },
    NotPublished,
}

/// One evaluated candidate, printable as a status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub id: String,
    pub title: String,
    pub elapsed_days: Option<i64>,
    pub outcome: Outcome,
}

impl Evaluation {
    pub fn is_ready(&self) -> bool {
        self.outcome == Outcome::Ready
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.outcome, self.elapsed_days) {
            (Outcome::Ready, Some(days)) => write!(
                f,
                "Post \"{}\" published {} days ago, updating",
                self.title, days
            ),
            (Outcome::Pending { days_to_go }, Some(days)) => write!(
                f,
                "Post \"{}\" published {} days ago, not updating, {} days to go",
                self.title, days, days_to_go
            ),
            _ => write!(f, "Post \"{}\" has not been published, skipping", self.title),
        }
    }
}

/// Result of filtering a candidate set
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Ready posts, in input order
    pub ready: Vec<ContentItem>,
    pub pending: Vec<ContentItem>,
    /// One entry per distinct candidate, in input order
    pub evaluations: Vec<Evaluation>,
}

/// Evaluate one post against the threshold at `now`.
pub fn evaluate(item: &ContentItem, threshold_days: u32, clock: &dyn Clock) -> Evaluation {
    let threshold = i64::from(threshold_days);
    let elapsed = item
        .published_at
        .map(|published| elapsed_days(clock.now(), published));

    let outcome = match elapsed {
        Some(days) if days > threshold => Outcome::Ready,
        Some(days) => Outcome::Pending {
            days_to_go: (threshold - days + 1).max(1),
        },
        None => Outcome::NotPublished,
    };

    Evaluation {
        id: item.id.clone(),
        title: item.title.clone(),
        elapsed_days: elapsed,
        outcome,
    }
}

/// Partition `items` into ready and pending.
///
/// Relative order of ready posts follows the input. A post id seen more
/// than once is only evaluated the first time.
pub fn select_eligible(
    items: Vec<ContentItem>,
    threshold_days: u32,
    clock: &dyn Clock,
) -> Selection {
    let mut seen = HashSet::new();
    let mut selection = Selection::default();

    for item in items {
        if !seen.insert(item.id.clone()) {
            continue;
        }
        let evaluation = evaluate(&item, threshold_days, clock);
        if evaluation.is_ready() {
            selection.ready.push(item);
        } else {
            selection.pending.push(item);
        }
        selection.evaluations.push(evaluation);
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, Duration, Utc};
    use ghost_admin::PostStatus;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn aged(id: &str, days: i64) -> ContentItem {
        let mut item = ContentItem::new(id, id);
        item.status = PostStatus::Published;
        item.published_at = Some(now() - Duration::days(days));
        item
    }

    #[test]
    fn test_boundary_is_pending() {
        let clock = FixedClock(now());
        let eval = evaluate(&aged("a", 7), 7, &clock);
        assert_eq!(eval.outcome, Outcome::Pending { days_to_go: 1 });

        let eval = evaluate(&aged("a", 8), 7, &clock);
        assert_eq!(eval.outcome, Outcome::Ready);
    }

    #[test]
    fn test_days_to_go() {
        let clock = FixedClock(now());
        let eval = evaluate(&aged("a", 2), 7, &clock);
        assert_eq!(eval.outcome, Outcome::Pending { days_to_go: 6 });
    }

    #[test]
    fn test_future_publish_date_is_pending() {
        let clock = FixedClock(now());
        let eval = evaluate(&aged("a", -3), 0, &clock);
        assert_eq!(eval.outcome, Outcome::Pending { days_to_go: 4 });
    }

    #[test]
    fn test_unpublished_never_ready() {
        let clock = FixedClock(now());
        let item = ContentItem::new("d", "Draft");
        let eval = evaluate(&item, 0, &clock);
        assert_eq!(eval.outcome, Outcome::NotPublished);
        assert!(eval.to_string().contains("has not been published"));
    }

    #[test]
    fn test_ready_preserves_input_order() {
        let clock = FixedClock(now());
        let items = vec![aged("x", 30), aged("y", 1), aged("z", 9), aged("w", 12)];
        let selection = select_eligible(items, 7, &clock);

        let ready: Vec<_> = selection.ready.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ready, vec!["x", "z", "w"]);
        assert_eq!(selection.pending.len(), 1);
        assert_eq!(selection.evaluations.len(), 4);
    }

    #[test]
    fn test_duplicate_ids_evaluated_once() {
        let clock = FixedClock(now());
        let items = vec![aged("x", 30), aged("x", 30)];
        let selection = select_eligible(items, 7, &clock);
        assert_eq!(selection.ready.len(), 1);
        assert_eq!(selection.evaluations.len(), 1);
    }

    #[test]
    fn test_status_lines() {
        let clock = FixedClock(now());
        let ready = evaluate(&aged("Old", 10), 7, &clock);
        assert_eq!(
            ready.to_string(),
            "Post \"Old\" published 10 days ago, updating"
        );
        let pending = evaluate(&aged("New", 5), 7, &clock);
        assert_eq!(
            pending.to_string(),
            "Post \"New\" published 5 days ago, not updating, 3 days to go"
        );
    }
}
