//! Classify distribution histories from a JSON file.
//!
//! Usage: `cadence-classify <events.json> [config.json] [--latest-first]`
//!
//! The events file is either an array of events for one instrument or an
//! object mapping instrument symbols to such arrays. Reports are written
//! to stdout as JSON; logs go to stderr (filter with `RUST_LOG`).

use anyhow::{Context, Result};
use cadence_core::{Config, DistributionEvent};
use cadence_normalize::{classify_many, DistributionEngine};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Deserialize)]
#[serde(untagged)]
enum EventsFile {
    Many(HashMap<String, Vec<DistributionEvent>>),
    One(Vec<DistributionEvent>),
}

#[derive(Parser)]
#[command(name = "cadence-classify")]
#[command(version, about = "Classify and normalize distribution histories")]
struct Cli {
    /// Events file: an event array, or a map of symbol to event array
    events: PathBuf,

    /// Config overlay applied over the selected profile
    config: Option<PathBuf>,

    /// Emit results newest first
    #[arg(long)]
    latest_first: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    info!(profile = ?config.profile, "configuration loaded");

    let raw = std::fs::read_to_string(&args.events)
        .with_context(|| format!("failed to read {}", args.events.display()))?;
    let input: EventsFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse events in {}", args.events.display()))?;

    let engine = DistributionEngine::new(config);
    let output = match input {
        EventsFile::One(events) => {
            let mut report = engine.classify(&events);
            if args.latest_first {
                report = report.most_recent_first();
            }
            serde_json::to_string_pretty(&report)?
        }
        EventsFile::Many(instruments) => {
            let mut reports = classify_many(&engine, instruments)?;
            if args.latest_first {
                reports = reports
                    .into_iter()
                    .map(|(symbol, report)| (symbol, report.most_recent_first()))
                    .collect();
            }
            serde_json::to_string_pretty(&reports)?
        }
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from(["cadence-classify", "events.json"]).unwrap();
        assert_eq!(cli.events, PathBuf::from("events.json"));
        assert_eq!(cli.config, None);
        assert!(!cli.latest_first);

        let cli = Cli::try_parse_from([
            "cadence-classify",
            "events.json",
            "cef.json",
            "--latest-first",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cef.json")));
        assert!(cli.latest_first);

        assert!(Cli::try_parse_from(["cadence-classify"]).is_err());
        assert!(Cli::try_parse_from(["cadence-classify", "a.json", "b.json", "c.json"]).is_err());
        assert!(Cli::try_parse_from(["cadence-classify", "a.json", "--bogus"]).is_err());
    }

    #[test]
    fn test_events_file_shapes() {
        let one: EventsFile =
            serde_json::from_str(r#"[{"id":"a","exDate":"2025-01-15","paidAmount":0.5}]"#).unwrap();
        assert!(matches!(one, EventsFile::One(ref events) if events.len() == 1));

        let many: EventsFile =
            serde_json::from_str(r#"{"XYZ":[{"id":"a","exDate":"2025-01-15","paidAmount":0.5}]}"#)
                .unwrap();
        assert!(matches!(many, EventsFile::Many(ref map) if map.contains_key("XYZ")));
    }
}
