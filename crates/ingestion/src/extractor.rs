//! Gap and amount feature extraction.
//!
//! For each event in an ascending series this computes the calendar-day gap
//! to its neighbours and the amount the classifier should reason about.

use cadence_core::{days_between, DistributionEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-event features consumed by the cadence classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventFeatures {
    /// Position in the ascending series.
    pub index: usize,
    /// Ex-dividend date.
    pub ex_date: NaiveDate,
    /// Days since the previous event, `None` for the first.
    pub days_since_prev: Option<i64>,
    /// Days until the next event, `None` for the last.
    pub days_to_next: Option<i64>,
    /// Candidate amount; 0 means unusable.
    pub amount: f64,
}

impl EventFeatures {
    /// Is the amount usable for cadence and yield logic?
    #[inline]
    pub fn has_amount(&self) -> bool {
        self.amount > 0.0
    }
}

/// Amount to reason about: the split-adjusted amount when positive, else the
/// declared amount when positive, else 0.
///
/// Splits make raw amounts incomparable across time, so an adjusted figure
/// always wins when present.
pub fn candidate_amount(event: &DistributionEvent) -> f64 {
    let usable = |a: Option<f64>| a.filter(|v| v.is_finite() && *v > 0.0);
    usable(event.adjusted_amount)
        .or_else(|| usable(event.paid_amount))
        .unwrap_or(0.0)
}

/// Features for event `i` of an ascending series.
pub fn features_at(events: &[DistributionEvent], i: usize) -> EventFeatures {
    let event = &events[i];
    let days_since_prev = i
        .checked_sub(1)
        .map(|p| days_between(events[p].ex_date, event.ex_date));
    let days_to_next = events
        .get(i + 1)
        .map(|next| days_between(event.ex_date, next.ex_date));

    EventFeatures {
        index: i,
        ex_date: event.ex_date,
        days_since_prev,
        days_to_next,
        amount: candidate_amount(event),
    }
}

/// Features for every event of an ascending series.
pub fn extract_features(events: &[DistributionEvent]) -> Vec<EventFeatures> {
    (0..events.len()).map(|i| features_at(events, i)).collect()
}
