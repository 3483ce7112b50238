//! Gap-length to frequency mapping.

use cadence_core::{Frequency, GapTable};

/// Maps calendar gaps onto cadences using a [`GapTable`].
#[derive(Debug, Clone, Copy)]
pub struct GapClassifier<'a> {
    table: &'a GapTable,
}

impl<'a> GapClassifier<'a> {
    pub fn new(table: &'a GapTable) -> Self {
        Self { table }
    }

    /// Cadence from the core ranges alone; `Irregular` outside all of them.
    pub fn strict(&self, days: i64) -> Frequency {
        self.table
            .strict
            .iter()
            .find(|r| r.contains(days))
            .map(|r| r.frequency)
            .unwrap_or(Frequency::Irregular)
    }

    /// Neighbouring cadence for a gap that slipped out of its core range.
    ///
    /// Callers must only trust this when the amount is unchanged.
    pub fn drift(&self, days: i64) -> Option<Frequency> {
        self.table
            .drift
            .iter()
            .find(|r| r.contains(days))
            .map(|r| r.frequency)
    }

    /// Strict cadence, falling back to the drift table when `amount_stable`.
    pub fn resolve(&self, days: i64, amount_stable: bool) -> Option<Frequency> {
        let strict = self.strict(days);
        if strict.is_periodic() {
            return Some(strict);
        }
        if amount_stable {
            self.drift(days)
        } else {
            None
        }
    }

    /// Does `days` fall in the core range of `frequency`?
    pub fn is_on_cadence(&self, days: i64, frequency: Frequency) -> bool {
        self.strict(days) == frequency
    }
}
