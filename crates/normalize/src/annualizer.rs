//! Annualization and series-wide normalization.
//!
//! Normalization runs as a second pass once the whole series is classified:
//! every yield-bearing event is divided by the same newest cadence, so one
//! instrument's history stays comparable with itself on a chart.

use crate::components::split_components;
use cadence_classifier::ClassifiedEvent;
use cadence_core::{ClassificationResult, ClassifierConfig, DistributionEvent, Frequency};

/// Cadence assumed when no periodic cadence was ever confirmed.
pub const DEFAULT_FREQUENCY: Frequency = Frequency::Monthly;

/// `amount * payments_per_year`, or `None` for unusable amounts, irregular
/// cadences and Special payments.
pub fn annualize(event: &ClassifiedEvent) -> Option<f64> {
    if !event.payment_type.is_yield_bearing() || !event.features.has_amount() {
        return None;
    }
    event
        .frequency
        .payments_per_year()
        .map(|n| event.features.amount * n as f64)
}

/// Cadence of the newest non-special event with a periodic cadence, or
/// [`DEFAULT_FREQUENCY`].
pub fn newest_frequency(classified: &[ClassifiedEvent]) -> Frequency {
    classified
        .iter()
        .rev()
        .filter(|e| e.payment_type.is_yield_bearing())
        .map(|e| e.frequency)
        .find(|f| f.is_periodic())
        .unwrap_or(DEFAULT_FREQUENCY)
}

/// Turns classifier output into final results.
#[derive(Debug, Clone)]
pub struct Normalizer {
    split_components: bool,
    replacement_fraction: f64,
}

impl Normalizer {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            split_components: config.split_components,
            replacement_fraction: config.replacement_fraction,
        }
    }

    /// Build results for an ascending series. `events` and `classified` must
    /// be index-aligned.
    ///
    /// Returns the results and the divisor cadence used.
    pub fn normalize(
        &self,
        events: &[DistributionEvent],
        classified: &[ClassifiedEvent],
    ) -> (Vec<ClassificationResult>, Frequency) {
        debug_assert_eq!(events.len(), classified.len());

        // Pass 1: per-event annualized amounts.
        let mut results: Vec<ClassificationResult> = events
            .iter()
            .zip(classified)
            .map(|(event, c)| {
                let (regular_component, special_component) = if self.split_components {
                    split_components(c, self.replacement_fraction)
                } else {
                    (None, None)
                };

                ClassificationResult {
                    id: event.id.clone(),
                    ex_date: event.ex_date,
                    amount: c.features.amount,
                    days_since_previous: c.features.days_since_prev,
                    payment_type: c.payment_type,
                    frequency: c.frequency,
                    payments_per_year: c.frequency.payments_per_year(),
                    annualized_amount: annualize(c),
                    normalized_amount: None,
                    regular_component,
                    special_component,
                    decided_by: c.decided_by,
                }
            })
            .collect();

        // Pass 2: one divisor for the whole series.
        let newest = newest_frequency(classified);
        let divisor = newest.payments_per_year().unwrap_or(12) as f64;
        for result in &mut results {
            result.normalized_amount = result.annualized_amount.map(|a| a / divisor);
        }

        (results, newest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cadence_classifier::CadenceClassifier;
    use cadence_core::{PaymentType, Profile};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_event(id: &str, ex_date: NaiveDate, amount: f64) -> DistributionEvent {
        DistributionEvent::new(id, ex_date, amount)
    }

    fn run(events: &[DistributionEvent], config: &ClassifierConfig) -> (Vec<ClassificationResult>, Frequency) {
        let classified = CadenceClassifier::new(config.clone()).classify(events);
        Normalizer::new(config).normalize(events, &classified)
    }

    #[test]
    fn test_december_triple_payment_normalized() {
        let events = vec![
            make_event("a", date(2025, 1, 15), 0.50),
            make_event("b", date(2025, 2, 15), 0.50),
            make_event("c", date(2025, 3, 15), 0.50),
            make_event("d", date(2025, 12, 15), 1.50),
        ];
        let (results, newest) = run(&events, &ClassifierConfig::default());

        assert_eq!(newest, Frequency::Monthly);
        for result in &results[..3] {
            assert_eq!(result.payments_per_year, Some(12));
            assert_relative_eq!(result.annualized_amount.unwrap(), 6.0);
            assert_relative_eq!(result.normalized_amount.unwrap(), 0.5);
        }

        let last = &results[3];
        assert_eq!(last.payment_type, PaymentType::Special);
        assert_eq!(last.days_since_previous, Some(275));
        assert_eq!(last.annualized_amount, None);
        assert_eq!(last.normalized_amount, None);
        assert_eq!(last.payments_per_year, None);
        // Components are only produced by the CEF profile
        assert_eq!(last.regular_component, None);
    }

    #[test]
    fn test_divisor_follows_newest_cadence() {
        // Quarterly payer that moved to monthly
        let events = vec![
            make_event("q1", date(2024, 1, 15), 0.30),
            make_event("q2", date(2024, 4, 15), 0.30),
            make_event("q3", date(2024, 7, 15), 0.30),
            make_event("m1", date(2024, 8, 15), 0.10),
            make_event("m2", date(2024, 9, 16), 0.10),
            make_event("m3", date(2024, 10, 15), 0.10),
        ];
        let (results, newest) = run(&events, &ClassifierConfig::default());

        assert_eq!(newest, Frequency::Monthly);
        // Old quarterly payments are expressed in monthly terms
        assert_relative_eq!(results[0].annualized_amount.unwrap(), 1.2);
        assert_relative_eq!(results[0].normalized_amount.unwrap(), 0.1);

        for r in &results {
            if let (Some(a), Some(n)) = (r.annualized_amount, r.normalized_amount) {
                assert_relative_eq!(n, a / 12.0);
            }
        }
    }

    #[test]
    fn test_default_divisor_without_cadence() {
        // Lone payment: no periodic cadence ever confirmed
        let events = vec![make_event("a", date(2025, 1, 15), 0.50)];
        let classified = CadenceClassifier::default().classify(&events);
        assert_eq!(newest_frequency(&classified), DEFAULT_FREQUENCY);

        let (results, _) = run(&events, &ClassifierConfig::default());
        assert_eq!(results[0].annualized_amount, None);
        assert_eq!(results[0].normalized_amount, None);
    }

    #[test]
    fn test_unusable_amount_yields_nulls() {
        let mut missing = make_event("b", date(2025, 2, 15), 0.0);
        missing.paid_amount = None;
        let events = vec![
            make_event("a", date(2025, 1, 15), 0.50),
            missing,
            make_event("c", date(2025, 3, 15), 0.50),
        ];
        let (results, _) = run(&events, &ClassifierConfig::default());

        assert_eq!(results[1].payment_type, PaymentType::Regular);
        assert_eq!(results[1].amount, 0.0);
        assert_eq!(results[1].annualized_amount, None);
        assert_eq!(results[1].normalized_amount, None);
        assert!(results[2].annualized_amount.is_some());
    }

    #[test]
    fn test_adjusted_amount_is_annualized() {
        // 2:1 split restated the first two payments
        let events = vec![
            make_event("a", date(2025, 1, 15), 1.00).with_adjusted(0.50),
            make_event("b", date(2025, 2, 15), 1.00).with_adjusted(0.50),
            make_event("c", date(2025, 3, 15), 0.50),
        ];
        let (results, _) = run(&events, &ClassifierConfig::default());

        assert!(results.iter().all(|r| r.payment_type != PaymentType::Special));
        for r in &results {
            assert_relative_eq!(r.annualized_amount.unwrap(), 6.0);
        }
    }

    #[test]
    fn test_cef_profile_splits_kicker() {
        let config = cadence_core::Config::for_profile(Profile::Cef).classifier;
        let events = vec![
            make_event("a", date(2025, 1, 15), 0.50),
            make_event("b", date(2025, 2, 15), 0.50),
            make_event("c", date(2025, 3, 15), 0.50),
            make_event("d", date(2025, 12, 15), 1.50),
        ];
        let (results, _) = run(&events, &config);

        let last = &results[3];
        assert_eq!(last.payment_type, PaymentType::Special);
        assert_relative_eq!(last.regular_component.unwrap(), 0.5);
        assert_relative_eq!(last.special_component.unwrap(), 1.0);

        assert_relative_eq!(results[0].regular_component.unwrap(), 0.5);
        assert_relative_eq!(results[0].special_component.unwrap(), 0.0);
    }
}
