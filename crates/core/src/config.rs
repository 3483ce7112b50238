//! Configuration structures for the dividend cadence engine.
//!
//! Two threshold profiles ship with the engine: [`Profile::Etf`] (wide
//! monthly band, narrow quarterly band) and [`Profile::Cef`] (strict monthly
//! band, wide quarterly band, component splitting of specials). A JSON
//! config file names a profile and overrides individual fields on top of it.

use crate::error::{Error, Result};
use crate::types::Frequency;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Threshold profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Exchange-traded funds and equities.
    #[default]
    Etf,
    /// Closed-end funds with year-end capital-gain kickers.
    Cef,
}

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Profile the thresholds were derived from.
    pub profile: Profile,
    /// Classifier thresholds.
    pub classifier: ClassifierConfig,
    /// Multi-instrument batch settings.
    pub batch: BatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_profile(Profile::Etf)
    }
}

impl Config {
    /// Preset configuration for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        let classifier = match profile {
            Profile::Etf => ClassifierConfig::etf(),
            Profile::Cef => ClassifierConfig::cef(),
        };
        Self {
            profile,
            classifier,
            batch: BatchConfig::default(),
        }
    }

    /// Parse a JSON config, layering its fields over the named profile preset.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overlay: Value = serde_json::from_str(json)?;
        let profile = match overlay.get("profile") {
            Some(p) => serde_json::from_value(p.clone())?,
            None => Profile::default(),
        };

        let mut base = serde_json::to_value(Self::for_profile(profile))?;
        merge_json(&mut base, overlay);

        let config: Config = serde_json::from_value(base)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check thresholds for internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()
    }
}

/// Recursively overwrite `base` with the fields present in `overlay`.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// An inclusive range of gap lengths mapped to a cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRange {
    /// Shortest gap in days (inclusive).
    pub min_days: i64,
    /// Longest gap in days (inclusive).
    pub max_days: i64,
    /// Cadence implied by gaps in the range.
    pub frequency: Frequency,
}

impl GapRange {
    pub const fn new(min_days: i64, max_days: i64, frequency: Frequency) -> Self {
        Self {
            min_days,
            max_days,
            frequency,
        }
    }

    #[inline]
    pub fn contains(&self, days: i64) -> bool {
        days >= self.min_days && days <= self.max_days
    }
}

/// Gap-length tables used to infer cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapTable {
    /// Core ranges, trusted on their own.
    pub strict: Vec<GapRange>,
    /// Holiday/short-period drift ranges, trusted only when the amount is stable.
    pub drift: Vec<GapRange>,
}

impl GapTable {
    pub fn etf() -> Self {
        Self {
            strict: vec![
                GapRange::new(5, 10, Frequency::Weekly),
                GapRange::new(20, 45, Frequency::Monthly),
                GapRange::new(80, 100, Frequency::Quarterly),
                GapRange::new(150, 249, Frequency::SemiAnnual),
                GapRange::new(250, 400, Frequency::Annual),
            ],
            drift: vec![
                GapRange::new(11, 13, Frequency::Weekly),
                GapRange::new(14, 19, Frequency::Monthly),
                GapRange::new(60, 79, Frequency::Quarterly),
                GapRange::new(101, 120, Frequency::Quarterly),
            ],
        }
    }

    pub fn cef() -> Self {
        Self {
            strict: vec![
                GapRange::new(5, 10, Frequency::Weekly),
                GapRange::new(26, 34, Frequency::Monthly),
                GapRange::new(46, 149, Frequency::Quarterly),
                GapRange::new(150, 249, Frequency::SemiAnnual),
                GapRange::new(250, 400, Frequency::Annual),
            ],
            drift: vec![
                GapRange::new(11, 13, Frequency::Weekly),
                GapRange::new(14, 25, Frequency::Monthly),
                GapRange::new(35, 45, Frequency::Monthly),
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        for range in self.strict.iter().chain(self.drift.iter()) {
            if range.min_days < 1 || range.min_days > range.max_days {
                return Err(Error::config(format!(
                    "invalid gap range {}..={} for {:?}",
                    range.min_days, range.max_days, range.frequency
                )));
            }
            if !range.frequency.is_periodic() {
                return Err(Error::config("gap ranges must map to a periodic frequency"));
            }
        }

        let mut sorted = self.strict.clone();
        sorted.sort_by_key(|r| r.min_days);
        for pair in sorted.windows(2) {
            if pair[1].min_days <= pair[0].max_days {
                return Err(Error::config(format!(
                    "strict gap ranges overlap: {}..={} and {}..={}",
                    pair[0].min_days, pair[0].max_days, pair[1].min_days, pair[1].max_days
                )));
            }
        }
        Ok(())
    }
}

/// Classifier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Multiple of the rolling median at which an off-cadence payment is extreme.
    pub special_multiplier: f64,
    /// Lower multiple used for round-number kickers.
    pub round_number_multiplier: f64,
    /// Amounts that are multiples of this unit count as round numbers.
    pub round_number_unit: f64,
    /// Relative tolerance for "amount unchanged" (0.02 = 2%).
    pub amount_stability_tolerance: f64,
    /// Absolute tolerance for exact amount repeats.
    pub amount_epsilon: f64,
    /// Confirmed amounts kept for the rolling median.
    pub amount_window: usize,
    /// Confirmed gaps considered by dominant-frequency voting.
    pub vote_window: usize,
    /// Share of votes needed for a dominant frequency.
    pub vote_majority: f64,
    /// Minimum classifiable gaps before voting can override.
    pub min_vote_gaps: usize,
    /// A payment below this fraction of the next one is a stub.
    pub stub_ratio: f64,
    /// Gaps up to this many days count as clustered.
    pub cluster_max_days: i64,
    /// How many following payments look-ahead confirmation inspects.
    pub lookahead: usize,
    /// Split baseline-plus-excess specials into components.
    pub split_components: bool,
    /// A special counts as replacing a regular payment once this fraction of
    /// the nominal period has elapsed since the last confirmed payment.
    pub replacement_fraction: f64,
    /// Gap-length tables.
    pub gap_table: GapTable,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::etf()
    }
}

impl ClassifierConfig {
    pub fn etf() -> Self {
        Self {
            special_multiplier: 2.3,
            round_number_multiplier: 1.5,
            round_number_unit: 0.25,
            amount_stability_tolerance: 0.02,
            amount_epsilon: 1e-6,
            amount_window: 12,
            vote_window: 6,
            vote_majority: 0.6,
            min_vote_gaps: 3,
            stub_ratio: 0.01,
            cluster_max_days: 4,
            lookahead: 2,
            split_components: false,
            replacement_fraction: 0.75,
            gap_table: GapTable::etf(),
        }
    }

    pub fn cef() -> Self {
        Self {
            amount_window: 6,
            split_components: true,
            gap_table: GapTable::cef(),
            ..Self::etf()
        }
    }

    /// Check thresholds for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if !(self.special_multiplier > 1.0) {
            return Err(Error::config("special_multiplier must be > 1"));
        }
        if !(self.round_number_multiplier > 1.0) {
            return Err(Error::config("round_number_multiplier must be > 1"));
        }
        if !(self.round_number_unit > 0.0) {
            return Err(Error::config("round_number_unit must be > 0"));
        }
        if !(0.0..1.0).contains(&self.amount_stability_tolerance) {
            return Err(Error::config("amount_stability_tolerance must be in [0, 1)"));
        }
        if !(self.amount_epsilon >= 0.0) {
            return Err(Error::config("amount_epsilon must be >= 0"));
        }
        if self.amount_window == 0 || self.vote_window == 0 {
            return Err(Error::config("history windows must be non-empty"));
        }
        if !(self.vote_majority > 0.5 && self.vote_majority <= 1.0) {
            return Err(Error::config("vote_majority must be in (0.5, 1]"));
        }
        if self.min_vote_gaps == 0 || self.min_vote_gaps > self.vote_window {
            return Err(Error::config("min_vote_gaps must be in 1..=vote_window"));
        }
        if self.lookahead == 0 || self.lookahead > self.vote_window {
            return Err(Error::config("lookahead must be in 1..=vote_window"));
        }
        if !(self.stub_ratio > 0.0 && self.stub_ratio < 1.0) {
            return Err(Error::config("stub_ratio must be in (0, 1)"));
        }
        if self.cluster_max_days < 1 {
            return Err(Error::config("cluster_max_days must be >= 1"));
        }
        if !(self.replacement_fraction > 0.0) {
            return Err(Error::config("replacement_fraction must be > 0"));
        }
        self.gap_table.validate()
    }
}

/// Multi-instrument batch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of parallel workers (0 = auto).
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { workers: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.profile, Profile::Etf);
        assert_eq!(config.classifier.special_multiplier, 2.3);
        assert_eq!(config.classifier.round_number_multiplier, 1.5);
        assert_eq!(config.classifier.amount_stability_tolerance, 0.02);
        assert!(!config.classifier.split_components);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cef_profile() {
        let config = Config::for_profile(Profile::Cef);
        assert!(config.classifier.split_components);
        assert_eq!(config.classifier.amount_window, 6);
        assert!(config
            .classifier
            .gap_table
            .strict
            .contains(&GapRange::new(26, 34, Frequency::Monthly)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_overrides_profile() {
        let json = r#"{"profile":"cef","classifier":{"special_multiplier":3.0},"batch":{"workers":4}}"#;
        let config = Config::from_json_str(json).unwrap();
        assert_eq!(config.profile, Profile::Cef);
        assert_eq!(config.classifier.special_multiplier, 3.0);
        // Untouched fields keep the CEF preset
        assert!(config.classifier.split_components);
        assert_eq!(config.classifier.gap_table, GapTable::cef());
        assert_eq!(config.batch.workers, 4);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_multiplier_rejected() {
        let json = r#"{"classifier":{"special_multiplier":0.5}}"#;
        let err = Config::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_lookahead_bounds() {
        for lookahead in ["0", "7", "18446744073709551615"] {
            let json = format!(r#"{{"classifier":{{"lookahead":{lookahead}}}}}"#);
            let err = Config::from_json_str(&json).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "lookahead {lookahead}");
        }

        let config = Config::from_json_str(r#"{"classifier":{"lookahead":6}}"#).unwrap();
        assert_eq!(config.classifier.lookahead, 6);
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let mut config = Config::default();
        config
            .classifier
            .gap_table
            .strict
            .push(GapRange::new(40, 60, Frequency::Quarterly));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gap_range_contains() {
        let range = GapRange::new(20, 45, Frequency::Monthly);
        assert!(range.contains(20));
        assert!(range.contains(45));
        assert!(!range.contains(19));
        assert!(!range.contains(46));
    }
}
