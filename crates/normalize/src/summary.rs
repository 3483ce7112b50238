//! Run-rate summary of a classified series.

use cadence_core::{days_between, ClassificationResult, Frequency, PaymentType};
use serde::{Deserialize, Serialize};

/// Trailing window for the twelve-month totals.
const TRAILING_DAYS: i64 = 365;

/// Aggregate figures for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    /// Total events.
    pub total_events: usize,
    pub initial_count: usize,
    pub regular_count: usize,
    pub special_count: usize,
    /// Cadence used as the normalization divisor.
    pub newest_frequency: Option<Frequency>,
    /// Amount of the newest yield-bearing payment with a usable amount.
    pub latest_regular_amount: Option<f64>,
    /// Normalized amount of that payment.
    pub latest_normalized_amount: Option<f64>,
    /// Latest regular amount at the newest cadence, per year.
    pub forward_annual_rate: Option<f64>,
    /// Forward annual rate expressed per week.
    pub weekly_equivalent: Option<f64>,
    /// Regular/Initial amounts with ex-date in the 365 days ending at the newest event.
    pub trailing_regular_total: f64,
    /// Special amounts in the same window.
    pub trailing_special_total: f64,
}

impl DistributionSummary {
    /// Summarize ascending results normalized by `newest`.
    pub fn from_results(results: &[ClassificationResult], newest: Frequency) -> Self {
        let mut summary = Self {
            total_events: results.len(),
            ..Self::default()
        };
        if results.is_empty() {
            return summary;
        }
        summary.newest_frequency = Some(newest);

        for r in results {
            match r.payment_type {
                PaymentType::Initial => summary.initial_count += 1,
                PaymentType::Regular => summary.regular_count += 1,
                PaymentType::Special => summary.special_count += 1,
            }
        }

        if let Some(latest) = results
            .iter()
            .rev()
            .find(|r| r.payment_type.is_yield_bearing() && r.amount > 0.0)
        {
            summary.latest_regular_amount = Some(latest.amount);
            summary.latest_normalized_amount = latest.normalized_amount;
            summary.forward_annual_rate = newest
                .payments_per_year()
                .map(|n| latest.amount * n as f64);
            summary.weekly_equivalent = summary.forward_annual_rate.map(|a| a / 52.0);
        }

        if let Some(last) = results.last() {
            for r in results
                .iter()
                .filter(|r| days_between(r.ex_date, last.ex_date) < TRAILING_DAYS)
            {
                if r.payment_type.is_yield_bearing() {
                    summary.trailing_regular_total += r.amount;
                } else {
                    summary.trailing_special_total += r.amount;
                }
            }
        }

        summary
    }

    /// Share of events labelled Special.
    pub fn special_frac(&self) -> f64 {
        if self.total_events > 0 {
            self.special_count as f64 / self.total_events as f64
        } else {
            0.0
        }
    }
}
