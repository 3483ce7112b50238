//! Small numeric helpers shared by the classifier stages.

use statrs::statistics::{Data, Median};
use std::collections::HashMap;
use std::hash::Hash;

/// Median of the values, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values.to_vec()).median())
}

/// Most frequent value and its count.
///
/// Returns `None` for an empty input or when two values share the top count.
pub fn mode<T, I>(values: I) -> Option<(T, usize)>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let top = counts.values().copied().max()?;
    let mut leaders = counts.into_iter().filter(|&(_, c)| c == top);
    let leader = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(leader)
}

/// `|a - b| <= epsilon`.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Is `amount` within `tolerance` (relative) of a positive `reference`?
#[inline]
pub fn within_tolerance(amount: f64, reference: f64, tolerance: f64) -> bool {
    reference > 0.0 && (amount - reference).abs() <= tolerance * reference
}

/// Is `amount` a whole, non-zero multiple of `unit` (e.g. $0.25, $0.50, $1.00)?
pub fn is_round_number(amount: f64, unit: f64) -> bool {
    if !(unit > 0.0) || !(amount > 0.0) {
        return false;
    }
    let units = amount / unit;
    units.round() >= 1.0 && (units - units.round()).abs() < 1e-6
}
