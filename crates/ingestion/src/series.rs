//! Ordering and sanity statistics for one instrument's event history.
//!
//! Callers may hand events over in any order. The series sorts them by
//! ex-date, breaking same-day ties by id so that the result never depends on
//! the caller's ordering.

use crate::extractor::candidate_amount;
use cadence_core::DistributionEvent;
use chrono::NaiveDate;
use tracing::warn;

/// Statistics about the quality of an event history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStats {
    /// Total events.
    pub total_events: usize,
    /// Events whose amount is missing, non-positive or non-finite.
    pub unusable_amounts: usize,
    /// Events carrying a usable split-adjusted amount.
    pub adjusted_amounts: usize,
    /// Events sharing an ex-date with their predecessor.
    pub duplicate_dates: usize,
    /// Earliest ex-date.
    pub first_date: Option<NaiveDate>,
    /// Latest ex-date.
    pub last_date: Option<NaiveDate>,
}

impl SeriesStats {
    /// Fraction of events with an unusable amount.
    pub fn unusable_frac(&self) -> f64 {
        if self.total_events > 0 {
            self.unusable_amounts as f64 / self.total_events as f64
        } else {
            0.0
        }
    }
}

/// One instrument's events in ascending ex-date order.
#[derive(Debug, Clone, Default)]
pub struct EventSeries {
    events: Vec<DistributionEvent>,
}

impl EventSeries {
    /// Build a series from events in arbitrary order.
    pub fn from_unordered(mut events: Vec<DistributionEvent>) -> Self {
        events.sort_by(|a, b| a.ex_date.cmp(&b.ex_date).then_with(|| a.id.cmp(&b.id)));

        let duplicates = events
            .windows(2)
            .filter(|pair| pair[0].ex_date == pair[1].ex_date)
            .count();
        if duplicates > 0 {
            warn!(duplicates, "distribution history contains repeated ex-dates");
        }

        Self { events }
    }

    /// Events in ascending order.
    pub fn events(&self) -> &[DistributionEvent] {
        &self.events
    }

    /// Consume the series, returning the ordered events.
    pub fn into_events(self) -> Vec<DistributionEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Compute quality statistics.
    pub fn stats(&self) -> SeriesStats {
        let mut stats = SeriesStats {
            total_events: self.events.len(),
            first_date: self.events.first().map(|e| e.ex_date),
            last_date: self.events.last().map(|e| e.ex_date),
            ..SeriesStats::default()
        };

        for (i, event) in self.events.iter().enumerate() {
            if candidate_amount(event) <= 0.0 {
                stats.unusable_amounts += 1;
            }
            if event.adjusted_amount.is_some_and(|a| a.is_finite() && a > 0.0) {
                stats.adjusted_amounts += 1;
            }
            if i > 0 && self.events[i - 1].ex_date == event.ex_date {
                stats.duplicate_dates += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_event(id: &str, ex_date: NaiveDate, amount: f64) -> DistributionEvent {
        DistributionEvent::new(id, ex_date, amount)
    }

    #[test]
    fn test_sorts_ascending() {
        let series = EventSeries::from_unordered(vec![
            make_event("c", date(2025, 3, 15), 0.5),
            make_event("a", date(2025, 1, 15), 0.5),
            make_event("b", date(2025, 2, 15), 0.5),
        ]);

        let ids: Vec<&str> = series.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_same_day_ties_break_by_id() {
        let forward = EventSeries::from_unordered(vec![
            make_event("x2", date(2025, 1, 15), 0.1),
            make_event("x1", date(2025, 1, 15), 0.5),
        ]);
        let backward = EventSeries::from_unordered(vec![
            make_event("x1", date(2025, 1, 15), 0.5),
            make_event("x2", date(2025, 1, 15), 0.1),
        ]);

        assert_eq!(forward.events(), backward.events());
        assert_eq!(forward.events()[0].id, "x1");
    }

    #[test]
    fn test_stats() {
        let mut missing = make_event("d", date(2025, 3, 15), 0.0);
        missing.paid_amount = None;

        let series = EventSeries::from_unordered(vec![
            make_event("a", date(2025, 1, 15), 0.5).with_adjusted(0.25),
            make_event("b", date(2025, 2, 15), 0.5),
            make_event("c", date(2025, 2, 15), -1.0),
            missing,
        ]);

        let stats = series.stats();
        assert_eq!(stats.total_events, 4);
        assert_eq!(stats.unusable_amounts, 2);
        assert_eq!(stats.adjusted_amounts, 1);
        assert_eq!(stats.duplicate_dates, 1);
        assert_eq!(stats.first_date, Some(date(2025, 1, 15)));
        assert_eq!(stats.last_date, Some(date(2025, 3, 15)));
        assert!((stats.unusable_frac() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_series() {
        let series = EventSeries::from_unordered(Vec::new());
        assert!(series.is_empty());
        let stats = series.stats();
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.unusable_frac(), 0.0);
        assert_eq!(stats.first_date, None);
    }
}
