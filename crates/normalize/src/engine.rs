//! Full per-instrument pipeline.
//!
//! Orders the caller's events, classifies them, then annualizes and
//! normalizes the results. The engine holds only configuration, so one
//! instance can serve any number of instruments, concurrently if needed.

use crate::annualizer::Normalizer;
use crate::summary::DistributionSummary;
use cadence_classifier::CadenceClassifier;
use cadence_core::{ClassificationResult, Config, DistributionEvent, Frequency};
use cadence_ingestion::EventSeries;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Classification output for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    /// One result per input event, ascending by ex-date.
    pub results: Vec<ClassificationResult>,
    /// Cadence every normalized amount was divided by.
    pub newest_frequency: Frequency,
    /// Run-rate summary.
    pub summary: DistributionSummary,
}

impl ClassificationReport {
    /// Reorder results newest first. Nothing else changes.
    pub fn most_recent_first(mut self) -> Self {
        self.results.reverse();
        self
    }

    /// Look up the result for an event id.
    pub fn get(&self, id: &str) -> Option<&ClassificationResult> {
        self.results.iter().find(|r| r.id == id)
    }
}

/// Dividend cadence classification and normalization engine.
#[derive(Debug, Clone)]
pub struct DistributionEngine {
    config: Config,
    classifier: CadenceClassifier,
    normalizer: Normalizer,
}

impl Default for DistributionEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl DistributionEngine {
    /// Create an engine from configuration.
    pub fn new(config: Config) -> Self {
        let classifier = CadenceClassifier::new(config.classifier.clone());
        let normalizer = Normalizer::new(&config.classifier);
        Self {
            config,
            classifier,
            normalizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify one instrument's events, given in any order.
    pub fn classify(&self, events: &[DistributionEvent]) -> ClassificationReport {
        let series = EventSeries::from_unordered(events.to_vec());

        let stats = series.stats();
        if stats.unusable_amounts > 0 {
            warn!(
                unusable = stats.unusable_amounts,
                total = stats.total_events,
                "events without a usable amount will not be annualized"
            );
        }

        let classified = self.classifier.classify(series.events());
        let (results, newest_frequency) = self.normalizer.normalize(series.events(), &classified);
        let summary = DistributionSummary::from_results(&results, newest_frequency);

        debug!(
            events = summary.total_events,
            specials = summary.special_count,
            newest = ?newest_frequency,
            "normalized distribution series"
        );

        ClassificationReport {
            results,
            newest_frequency,
            summary,
        }
    }
}

/// Classify one instrument's events with the default configuration.
pub fn classify(events: &[DistributionEvent]) -> Vec<ClassificationResult> {
    DistributionEngine::default().classify(events).results
}
