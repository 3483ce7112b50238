//! Regular/special component split.
//!
//! A closed-end fund's year-end payment often folds the ordinary
//! distribution and a capital-gain kicker into one record. When a Special
//! arrives roughly when a regular payment was due, the rolling median is
//! taken as the ordinary part and the rest as the kicker.

use cadence_classifier::ClassifiedEvent;
use cadence_core::PaymentType;

/// `(regular_component, special_component)` for one classified event.
///
/// Regular and Initial payments are entirely regular. A Special is split at
/// the baseline when it exceeds the baseline and at least
/// `replacement_fraction` of the reference period has passed since the last
/// confirmed payment; otherwise it is entirely special. Unusable amounts
/// have no components.
pub fn split_components(event: &ClassifiedEvent, replacement_fraction: f64) -> (Option<f64>, Option<f64>) {
    let amount = event.features.amount;
    if amount <= 0.0 {
        return (None, None);
    }

    if event.payment_type != PaymentType::Special {
        return (Some(amount), Some(0.0));
    }

    let period_days = event.reference.and_then(|f| f.nominal_period_days());
    match (event.baseline, period_days, event.days_since_confirmed) {
        (Some(baseline), Some(period), Some(days))
            if amount > baseline && days as f64 >= replacement_fraction * period =>
        {
            (Some(baseline), Some(amount - baseline))
        }
        _ => (Some(0.0), Some(amount)),
    }
}
