//! Rolling history of confirmed payments.
//!
//! Only non-special events are ever absorbed, so a one-off payment can never
//! move the median or the cadence vote.

use crate::stats::median;
use cadence_core::Frequency;
use chrono::{Datelike, NaiveDate};
use std::collections::VecDeque;

/// Accumulator threaded through the classification fold.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    /// Recent confirmed amounts.
    amounts: VecDeque<f64>,
    /// Recent gaps between consecutive confirmed payments.
    gaps: VecDeque<i64>,
    amount_window: usize,
    gap_window: usize,
    /// Date of the last confirmed payment.
    last_date: Option<NaiveDate>,
    /// Amount of the last confirmed payment.
    last_amount: Option<f64>,
    /// Cadence of the newest confirmed payment with a periodic frequency.
    newest_frequency: Option<Frequency>,
}

impl RollingHistory {
    /// Create an empty history.
    pub fn new(amount_window: usize, gap_window: usize) -> Self {
        Self {
            amounts: VecDeque::with_capacity(amount_window),
            gaps: VecDeque::with_capacity(gap_window),
            amount_window,
            gap_window,
            last_date: None,
            last_amount: None,
            newest_frequency: None,
        }
    }

    /// Absorb a confirmed (non-special) payment.
    ///
    /// `amount` of 0 means unusable and is kept out of the median.
    pub fn confirm(&mut self, ex_date: NaiveDate, amount: f64, frequency: Frequency) {
        if let Some(last) = self.last_date {
            if self.gaps.len() >= self.gap_window {
                self.gaps.pop_front();
            }
            self.gaps.push_back((ex_date - last).num_days());
        }

        if amount > 0.0 {
            if self.amounts.len() >= self.amount_window {
                self.amounts.pop_front();
            }
            self.amounts.push_back(amount);
            self.last_amount = Some(amount);
        }

        if frequency.is_periodic() {
            self.newest_frequency = Some(frequency);
        }
        self.last_date = Some(ex_date);
    }

    /// Median of the confirmed amounts.
    pub fn median_amount(&self) -> Option<f64> {
        let amounts: Vec<f64> = self.amounts.iter().copied().collect();
        median(&amounts)
    }

    /// Gaps between confirmed payments, oldest first.
    pub fn gaps(&self) -> impl Iterator<Item = i64> + '_ {
        self.gaps.iter().copied()
    }

    /// Days from the last confirmed payment to `ex_date`.
    pub fn days_since_confirmed(&self, ex_date: NaiveDate) -> Option<i64> {
        self.last_date.map(|last| (ex_date - last).num_days())
    }

    /// Does `ex_date` fall in the same calendar month as the last confirmed payment?
    pub fn same_month_as_confirmed(&self, ex_date: NaiveDate) -> bool {
        self.last_date
            .is_some_and(|last| last.year() == ex_date.year() && last.month() == ex_date.month())
    }

    pub fn last_amount(&self) -> Option<f64> {
        self.last_amount
    }

    pub fn newest_frequency(&self) -> Option<Frequency> {
        self.newest_frequency
    }

    /// Number of confirmed amounts held.
    pub fn amount_count(&self) -> usize {
        self.amounts.len()
    }

    /// Gap between the two most recent confirmed payments.
    pub fn last_gap(&self) -> Option<i64> {
        self.gaps.back().copied()
    }
}
