//! Core types and configuration for the dividend cadence engine.
//!
//! This crate provides shared types used across all other crates:
//! - Distribution events and classification results
//! - Payment types and cadence labels
//! - Configuration structures and threshold profiles
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{BatchConfig, ClassifierConfig, Config, GapRange, GapTable, Profile};
pub use error::{Error, Result};
pub use types::*;
