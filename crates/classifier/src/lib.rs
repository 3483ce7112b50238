//! Cadence classification for the dividend cadence engine.
//!
//! This crate handles:
//! - Shared numeric helpers (median, mode, tolerance comparison)
//! - Gap-to-frequency tables with holiday drift
//! - Rolling history of confirmed (non-special) payments
//! - Dominant-frequency voting
//! - The ordered payment-type rule cascade
//! - The per-series classification fold

pub mod stats;
pub mod cadence;
pub mod history;
pub mod voting;
pub mod rules;
pub mod classifier;

pub use cadence::GapClassifier;
pub use classifier::{CadenceClassifier, ClassifiedEvent};
pub use history::RollingHistory;
pub use rules::{EventContext, Verdict};
pub use voting::dominant_frequency;
