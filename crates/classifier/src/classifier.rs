//! Per-series cadence classification.
//!
//! Events are folded in ascending order through a [`RollingHistory`]. For
//! each event the classifier builds an [`EventContext`] from the history and
//! the look-ahead window, runs the rule cascade, resolves the frequency, and
//! absorbs the event into the history unless it was labelled Special.

use crate::cadence::GapClassifier;
use crate::history::RollingHistory;
use crate::rules::{evaluate, EventContext, RuleEnv};
use crate::stats::within_tolerance;
use crate::voting::dominant_frequency;
use cadence_core::{ClassifierConfig, DecisionRule, DistributionEvent, Frequency, PaymentType};
use cadence_ingestion::{extract_features, EventFeatures};
use tracing::{debug, trace};

/// Classifier output for one event, before annualization.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent {
    /// Extracted gap and amount features.
    pub features: EventFeatures,
    pub payment_type: PaymentType,
    /// Cadence in effect; always `Irregular` for Special events.
    pub frequency: Frequency,
    /// Rule that produced the payment type.
    pub decided_by: DecisionRule,
    /// Rolling median of confirmed amounts when the event was decided.
    pub baseline: Option<f64>,
    /// Cadence the event's gap was judged against.
    pub reference: Option<Frequency>,
    /// Days since the last confirmed payment.
    pub days_since_confirmed: Option<i64>,
}

/// Stateless cadence classifier. Each call to [`CadenceClassifier::classify`]
/// owns its own history.
#[derive(Debug, Clone, Default)]
pub struct CadenceClassifier {
    config: ClassifierConfig,
}

impl CadenceClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify an ascending series of events.
    pub fn classify(&self, events: &[DistributionEvent]) -> Vec<ClassifiedEvent> {
        let features = extract_features(events);
        let env = RuleEnv::new(&self.config);
        let history = RollingHistory::new(self.config.amount_window, self.config.vote_window);

        let (history, classified) = features.iter().fold(
            (history, Vec::with_capacity(features.len())),
            |(mut history, mut out), f| {
                let event = self.decide(&env, &history, &features, f.index);
                if event.payment_type.is_yield_bearing() {
                    history.confirm(f.ex_date, f.amount, event.frequency);
                }
                out.push(event);
                (history, out)
            },
        );

        debug!(
            events = classified.len(),
            confirmed_amounts = history.amount_count(),
            specials = classified.iter().filter(|e| e.payment_type == PaymentType::Special).count(),
            "classified distribution series"
        );

        classified
    }

    /// Decide payment type and frequency for event `i` given the history of
    /// everything before it.
    pub fn decide(
        &self,
        env: &RuleEnv<'_>,
        history: &RollingHistory,
        features: &[EventFeatures],
        i: usize,
    ) -> ClassifiedEvent {
        let f = features[i];
        let vote = dominant_frequency(
            history.gaps(),
            &env.gaps,
            self.config.min_vote_gaps,
            self.config.vote_majority,
        );

        let upcoming_end = (i + 1)
            .saturating_add(self.config.lookahead)
            .min(features.len());
        let ctx = EventContext {
            features: f,
            upcoming: &features[i + 1..upcoming_end],
            previous_amount: i
                .checked_sub(1)
                .map(|p| features[p].amount)
                .filter(|a| *a > 0.0),
            days_since_confirmed: history.days_since_confirmed(f.ex_date),
            median: history.median_amount(),
            reference: vote.or(history.newest_frequency()),
            same_month_as_confirmed: history.same_month_as_confirmed(f.ex_date),
        };

        let verdict = evaluate(&ctx, env);
        let frequency = match verdict.payment_type {
            PaymentType::Special => Frequency::Irregular,
            _ => self.resolve_frequency(&ctx, &env.gaps, vote, history),
        };

        trace!(
            index = i,
            ex_date = %f.ex_date,
            amount = f.amount,
            payment_type = ?verdict.payment_type,
            frequency = ?frequency,
            rule = ?verdict.rule,
            "classified distribution"
        );

        ClassifiedEvent {
            features: f,
            payment_type: verdict.payment_type,
            frequency,
            decided_by: verdict.rule,
            baseline: ctx.median,
            reference: ctx.reference,
            days_since_confirmed: ctx.days_since_confirmed,
        }
    }

    /// Cadence for a confirmed (non-special) event.
    ///
    /// The gap since the last confirmed payment is looked up in the strict
    /// table, or the drift table when the amount is unchanged. A disagreeing
    /// dominant vote overrides it unless the following gap confirms the new
    /// cadence. The newest event has no following gap, so there the previous
    /// confirmed gap stands in for it.
    fn resolve_frequency(
        &self,
        ctx: &EventContext<'_>,
        gaps: &GapClassifier<'_>,
        vote: Option<Frequency>,
        history: &RollingHistory,
    ) -> Frequency {
        let tolerance = self.config.amount_stability_tolerance;

        let Some(days) = ctx.days_since_confirmed else {
            // Nothing confirmed yet: judge the cadence by the following gap.
            let Some(days_to_next) = ctx.features.days_to_next else {
                return Frequency::Irregular;
            };
            let stable = ctx
                .upcoming
                .first()
                .is_some_and(|next| within_tolerance(ctx.amount(), next.amount, tolerance));
            return gaps
                .resolve(days_to_next, stable)
                .unwrap_or(Frequency::Irregular);
        };

        let stable = ctx.matches_median(&self.config)
            || history
                .last_amount()
                .is_some_and(|last| within_tolerance(ctx.amount(), last, tolerance));

        match (gaps.resolve(days, stable), vote) {
            (Some(candidate), Some(voted)) if candidate != voted => {
                let confirmed = match ctx.features.days_to_next {
                    Some(d) => gaps.is_on_cadence(d, candidate),
                    None => history
                        .last_gap()
                        .is_some_and(|g| gaps.is_on_cadence(g, candidate)),
                };
                if confirmed {
                    candidate
                } else {
                    voted
                }
            }
            (Some(candidate), _) => candidate,
            (None, Some(voted)) => voted,
            (None, None) => Frequency::Irregular,
        }
    }
}
