//! Annualization and normalization for the dividend cadence engine.
//!
//! This crate provides:
//! - Per-event annualized amounts
//! - Series-wide normalization by the newest confirmed cadence
//! - Regular/special component splitting
//! - Run-rate summaries
//! - The full per-instrument pipeline and a parallel multi-instrument batch

pub mod annualizer;
pub mod components;
pub mod summary;
pub mod engine;
pub mod batch;

pub use annualizer::{annualize, newest_frequency, Normalizer};
pub use batch::classify_many;
pub use engine::{classify, ClassificationReport, DistributionEngine};
pub use summary::DistributionSummary;
