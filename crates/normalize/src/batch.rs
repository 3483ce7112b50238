//! Parallel classification of many instruments.

use crate::engine::{ClassificationReport, DistributionEngine};
use cadence_core::{DistributionEvent, Error, Result};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Classify every instrument independently and in parallel.
///
/// Instruments share no state, so the output is the same for any worker
/// count. `config.batch.workers == 0` uses rayon's global pool.
pub fn classify_many(
    engine: &DistributionEngine,
    instruments: HashMap<String, Vec<DistributionEvent>>,
) -> Result<BTreeMap<String, ClassificationReport>> {
    let workers = engine.config().batch.workers;
    let total_events: usize = instruments.values().map(Vec::len).sum();
    info!(
        instruments = instruments.len(),
        events = total_events,
        workers,
        "classifying batch"
    );

    let run = || -> BTreeMap<String, ClassificationReport> {
        instruments
            .into_par_iter()
            .map(|(symbol, events)| {
                let report = engine.classify(&events);
                (symbol, report)
            })
            .collect()
    };

    let reports = if workers > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::Other(format!("failed to build worker pool: {e}")))?;
        pool.install(run)
    } else {
        run()
    };

    let specials: usize = reports.values().map(|r| r.summary.special_count).sum();
    info!(
        instruments = reports.len(),
        specials,
        "batch complete"
    );

    Ok(reports)
}
