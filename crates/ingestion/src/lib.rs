//! Event preparation for the dividend cadence engine.
//!
//! This crate handles:
//! - Ordering an instrument's events by ex-date
//! - Amount selection (split-adjusted over declared)
//! - Gap extraction to the previous and next event

pub mod series;
pub mod extractor;

pub use series::{EventSeries, SeriesStats};
pub use extractor::{candidate_amount, extract_features, EventFeatures};
