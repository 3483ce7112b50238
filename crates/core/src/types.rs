//! Core data types for the dividend cadence engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whole calendar days from `earlier` to `later` (negative if reversed).
#[inline]
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// A single cash distribution record for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEvent {
    /// Opaque identifier, unique within the instrument.
    pub id: String,
    /// Ex-dividend date.
    pub ex_date: NaiveDate,
    /// Amount as declared.
    #[serde(default)]
    pub paid_amount: Option<f64>,
    /// Amount restated for later splits.
    #[serde(default)]
    pub adjusted_amount: Option<f64>,
}

impl DistributionEvent {
    /// Create an event with a declared amount and no split adjustment.
    pub fn new(id: impl Into<String>, ex_date: NaiveDate, paid_amount: f64) -> Self {
        Self {
            id: id.into(),
            ex_date,
            paid_amount: Some(paid_amount),
            adjusted_amount: None,
        }
    }

    /// Attach a split-adjusted amount.
    pub fn with_adjusted(mut self, adjusted_amount: f64) -> Self {
        self.adjusted_amount = Some(adjusted_amount);
        self
    }
}

/// Payment cadence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    /// No stable cadence could be inferred.
    Irregular,
}

impl Frequency {
    /// All periodic cadences, fastest first.
    pub const PERIODIC: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnual,
        Frequency::Annual,
    ];

    /// Number of payments per year, `None` for irregular.
    #[inline]
    pub fn payments_per_year(self) -> Option<u32> {
        match self {
            Frequency::Weekly => Some(52),
            Frequency::Monthly => Some(12),
            Frequency::Quarterly => Some(4),
            Frequency::SemiAnnual => Some(2),
            Frequency::Annual => Some(1),
            Frequency::Irregular => None,
        }
    }

    /// Inverse of [`Frequency::payments_per_year`].
    pub fn from_payments_per_year(n: u32) -> Option<Self> {
        Self::PERIODIC
            .into_iter()
            .find(|f| f.payments_per_year() == Some(n))
    }

    /// Nominal length of one period in days.
    pub fn nominal_period_days(self) -> Option<f64> {
        self.payments_per_year().map(|n| 365.25 / n as f64)
    }

    /// Is this a periodic (non-irregular) cadence?
    #[inline]
    pub fn is_periodic(self) -> bool {
        self != Frequency::Irregular
    }
}

/// Payment type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// First observed distribution.
    Initial,
    /// Consistent with the established pattern.
    Regular,
    /// One-off distribution, excluded from run-rate aggregates.
    Special,
}

impl PaymentType {
    /// Does this payment contribute to yield and run-rate figures?
    #[inline]
    pub fn is_yield_bearing(self) -> bool {
        !matches!(self, PaymentType::Special)
    }
}

/// Which classification rule produced an event's payment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionRule {
    /// No previous event.
    FirstEvent,
    /// Amount could not be used; kept regular.
    UnusableAmount,
    /// Same amount as the previous event.
    RepeatedAmount,
    /// Fractional catch-up just before a full payment.
    StubPayment,
    /// Payment a few days after the previous one.
    ClusteredPayment,
    /// Large off-cadence amount.
    ExtremeAmount,
    /// Round-number year-end kicker.
    RoundNumberKicker,
    /// Second distribution in a month, or a January payment.
    CalendarMonth,
    /// Nothing objected.
    Default,
}

/// Classification and normalization output for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Identifier of the source event.
    pub id: String,
    /// Ex-dividend date of the source event.
    pub ex_date: NaiveDate,
    /// Amount used for classification (0 when unusable).
    pub amount: f64,
    /// Days since the previous event, `None` for the first.
    pub days_since_previous: Option<i64>,
    /// Initial, Regular or Special.
    pub payment_type: PaymentType,
    /// Cadence in effect; `Irregular` for Special payments.
    pub frequency: Frequency,
    /// Payments per year implied by `frequency`.
    pub payments_per_year: Option<u32>,
    /// `amount * payments_per_year`, Initial/Regular only.
    pub annualized_amount: Option<f64>,
    /// Annualized amount over the series-wide newest frequency.
    pub normalized_amount: Option<f64>,
    /// Baseline part of the payment (component split only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_component: Option<f64>,
    /// Excess part of the payment (component split only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_component: Option<f64>,
    pub decided_by: DecisionRule,
}

impl ClassificationResult {
    /// Is this a Special payment?
    #[inline]
    pub fn is_special(&self) -> bool {
        self.payment_type == PaymentType::Special
    }
}
