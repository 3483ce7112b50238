//! Payment-type rule cascade.
//!
//! Each rule is a guard that either returns a [`Verdict`] or abstains. Guards
//! run in priority order and the first verdict wins; when every guard
//! abstains the event is Regular. No single signal is allowed to produce a
//! Special: each Special verdict needs two independent pieces of evidence
//! (gap and amount, or amount and look-ahead).

use crate::cadence::GapClassifier;
use crate::stats::{approx_eq, is_round_number, within_tolerance};
use cadence_core::{ClassifierConfig, DecisionRule, Frequency, PaymentType};
use cadence_ingestion::EventFeatures;
use chrono::Datelike;

/// Outcome of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub payment_type: PaymentType,
    pub rule: DecisionRule,
}

impl Verdict {
    pub fn regular(rule: DecisionRule) -> Self {
        Self {
            payment_type: PaymentType::Regular,
            rule,
        }
    }

    pub fn special(rule: DecisionRule) -> Self {
        Self {
            payment_type: PaymentType::Special,
            rule,
        }
    }
}

/// Everything a rule may look at for one event.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    /// The event itself.
    pub features: EventFeatures,
    /// Following events, nearest first, at most `lookahead` long.
    pub upcoming: &'a [EventFeatures],
    /// Usable amount of the immediately preceding event, special or not.
    pub previous_amount: Option<f64>,
    /// Days since the last confirmed (non-special) payment.
    pub days_since_confirmed: Option<i64>,
    /// Rolling median of confirmed amounts.
    pub median: Option<f64>,
    /// Cadence the gap is judged against: the dominant vote, else the
    /// newest confirmed cadence.
    pub reference: Option<Frequency>,
    /// Same calendar month as the last confirmed payment.
    pub same_month_as_confirmed: bool,
}

impl EventContext<'_> {
    #[inline]
    pub fn amount(&self) -> f64 {
        self.features.amount
    }

    /// Gap to the preceding event is short enough to count as clustered.
    pub fn is_clustered(&self, config: &ClassifierConfig) -> bool {
        self.features
            .days_since_prev
            .is_some_and(|d| d <= config.cluster_max_days)
    }

    /// Amount matches the rolling median.
    pub fn matches_median(&self, config: &ClassifierConfig) -> bool {
        self.median
            .is_some_and(|m| within_tolerance(self.amount(), m, config.amount_stability_tolerance))
    }

    /// Amount deviates from the rolling median. Abstains (false) without history.
    pub fn deviates_from_median(&self, config: &ClassifierConfig) -> bool {
        self.median
            .is_some_and(|m| !within_tolerance(self.amount(), m, config.amount_stability_tolerance))
    }

    /// One of the next `lookahead` payments repeats this amount.
    pub fn matches_upcoming(&self, config: &ClassifierConfig) -> bool {
        self.upcoming.iter().take(config.lookahead).any(|next| {
            next.has_amount()
                && within_tolerance(self.amount(), next.amount, config.amount_stability_tolerance)
        })
    }

    /// The very next payment repeats this amount.
    pub fn repeats_next(&self, config: &ClassifierConfig) -> bool {
        self.upcoming.first().is_some_and(|next| {
            next.has_amount()
                && within_tolerance(self.amount(), next.amount, config.amount_stability_tolerance)
        })
    }

    /// Gap since the last confirmed payment is outside the reference cadence.
    /// Abstains (false) when there is no reference yet.
    pub fn off_cadence(&self, gaps: &GapClassifier<'_>) -> bool {
        match (self.reference, self.days_since_confirmed) {
            (Some(reference), Some(days)) => !gaps.is_on_cadence(days, reference),
            _ => false,
        }
    }
}

/// Configuration a rule evaluates against.
#[derive(Debug, Clone, Copy)]
pub struct RuleEnv<'a> {
    pub config: &'a ClassifierConfig,
    pub gaps: GapClassifier<'a>,
}

impl<'a> RuleEnv<'a> {
    pub fn new(config: &'a ClassifierConfig) -> Self {
        Self {
            config,
            gaps: GapClassifier::new(&config.gap_table),
        }
    }
}

/// A rule: a verdict, or `None` for no opinion.
pub type Guard = fn(&EventContext<'_>, &RuleEnv<'_>) -> Option<Verdict>;

/// Rules in priority order.
pub const CASCADE: [Guard; 8] = [
    first_event,
    unusable_amount,
    repeated_amount,
    stub_payment,
    clustered_payment,
    extreme_amount,
    round_number_kicker,
    calendar_month,
];

/// Run the cascade; Regular when every rule abstains.
pub fn evaluate(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Verdict {
    CASCADE
        .iter()
        .find_map(|guard| guard(ctx, env))
        .unwrap_or_else(|| Verdict::regular(DecisionRule::Default))
}

/// 1. No previous event.
pub fn first_event(ctx: &EventContext<'_>, _env: &RuleEnv<'_>) -> Option<Verdict> {
    ctx.features.days_since_prev.is_none().then_some(Verdict {
        payment_type: PaymentType::Initial,
        rule: DecisionRule::FirstEvent,
    })
}

/// Nothing can be inferred from a missing amount.
pub fn unusable_amount(ctx: &EventContext<'_>, _env: &RuleEnv<'_>) -> Option<Verdict> {
    (!ctx.features.has_amount()).then(|| Verdict::regular(DecisionRule::UnusableAmount))
}

/// 2. Same amount as the previous event, outside a cluster.
pub fn repeated_amount(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Option<Verdict> {
    let previous = ctx.previous_amount?;
    if ctx.is_clustered(env.config) {
        return None;
    }
    approx_eq(ctx.amount(), previous, env.config.amount_epsilon)
        .then(|| Verdict::regular(DecisionRule::RepeatedAmount))
}

/// 3. Fractional catch-up a few days before a full payment.
pub fn stub_payment(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Option<Verdict> {
    let days_to_next = ctx.features.days_to_next?;
    let next = ctx.upcoming.first()?;
    let is_stub = days_to_next <= env.config.cluster_max_days
        && next.has_amount()
        && ctx.amount() < env.config.stub_ratio * next.amount;
    is_stub.then(|| Verdict::special(DecisionRule::StubPayment))
}

/// 4. A payment days after the previous one is Regular only if it matches
/// the established rate or the rate that follows it.
pub fn clustered_payment(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Option<Verdict> {
    if !ctx.is_clustered(env.config) {
        return None;
    }
    if ctx.matches_median(env.config) || ctx.matches_upcoming(env.config) {
        Some(Verdict::regular(DecisionRule::ClusteredPayment))
    } else {
        Some(Verdict::special(DecisionRule::ClusteredPayment))
    }
}

/// 5. Far above the median, off-cadence, and not repeated next time.
pub fn extreme_amount(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Option<Verdict> {
    let median = ctx.median?;
    let is_extreme = ctx.amount() >= env.config.special_multiplier * median
        && ctx.off_cadence(&env.gaps)
        && !ctx.repeats_next(env.config);
    is_extreme.then(|| Verdict::special(DecisionRule::ExtremeAmount))
}

/// 5b. Round-number kicker (exact $0.25 multiples) at a lower multiple of
/// the median, under the same off-cadence and no-repeat conditions.
pub fn round_number_kicker(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Option<Verdict> {
    let median = ctx.median?;
    let is_kicker = is_round_number(ctx.amount(), env.config.round_number_unit)
        && ctx.amount() >= env.config.round_number_multiplier * median
        && ctx.off_cadence(&env.gaps)
        && !ctx.repeats_next(env.config);
    is_kicker.then(|| Verdict::special(DecisionRule::RoundNumberKicker))
}

/// 6. Second distribution within a month on a monthly-or-slower cadence, or
/// a January payment that moved off the median: Special only when it is
/// off-cadence, deviates from the median, and the next payments do not
/// confirm a new rate.
pub fn calendar_month(ctx: &EventContext<'_>, env: &RuleEnv<'_>) -> Option<Verdict> {
    let monthly_or_slower = ctx
        .reference
        .and_then(Frequency::payments_per_year)
        .is_some_and(|n| n <= 12);
    let second_in_month = ctx.same_month_as_confirmed && monthly_or_slower;
    let deviates = ctx.deviates_from_median(env.config);
    let january_change = ctx.features.ex_date.month() == 1 && deviates;

    if !second_in_month && !january_change {
        return None;
    }

    if ctx.off_cadence(&env.gaps) && deviates && !ctx.matches_upcoming(env.config) {
        Some(Verdict::special(DecisionRule::CalendarMonth))
    } else {
        Some(Verdict::regular(DecisionRule::CalendarMonth))
    }
}
