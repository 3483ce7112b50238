//! Dominant-frequency voting over recent confirmed gaps.

use crate::cadence::GapClassifier;
use crate::stats::mode;
use cadence_core::Frequency;

/// Prevailing cadence among recent gaps.
///
/// Each gap is classified through the strict table. A frequency wins only
/// when at least `min_gaps` gaps are classifiable and it holds at least
/// `majority` of all gaps considered. Ties yield `None`.
pub fn dominant_frequency<I>(
    gaps: I,
    classifier: &GapClassifier<'_>,
    min_gaps: usize,
    majority: f64,
) -> Option<Frequency>
where
    I: IntoIterator<Item = i64>,
{
    let labels: Vec<Frequency> = gaps.into_iter().map(|g| classifier.strict(g)).collect();
    let classifiable = labels.iter().filter(|f| f.is_periodic()).count();
    if classifiable < min_gaps {
        return None;
    }

    let (winner, votes) = mode(labels.iter().copied().filter(|f| f.is_periodic()))?;
    if votes as f64 / labels.len() as f64 >= majority {
        Some(winner)
    } else {
        None
    }
}
