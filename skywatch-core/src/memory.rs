//! In-memory collaborators for testing and replay
//!
//! These implement the [collaborator traits](crate::traits) without any I/O:
//!
//! 1. **Unit testing**: drive a [`Station`](crate::Station) with known data
//! 2. **Replay**: re-run the classifier over a recorded history
//! 3. **Embedded use**: keep the config in RAM on targets without storage
//!
//! ## Example
//!
//! ```rust
//! use skywatch_core::memory::{MemoryConfigStore, ReplaySource};
//! use skywatch_core::{Station, ThresholdConfig, UnitSystem};
//! # use skywatch_core::testing::reading_with_rain;
//!
//! let recorded = vec![reading_with_rain(1, 5.0), reading_with_rain(2, 60.0)];
//! let source = ReplaySource::new(&recorded, UnitSystem::Metric);
//!
//! let mut station = Station::new(MemoryConfigStore::with_config(ThresholdConfig::default()), 10)?;
//! station.load_config()?;
//! while !source.is_exhausted() {
//!     station.ingest(&source)?;
//! }
//! assert_eq!(station.history().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use thiserror_no_std::Error;

use crate::{
    buffer::Snapshot,
    config::{ThresholdConfig, UnitSystem, Units},
    reading::Reading,
    traits::{ConfigStore, ReadingSource, SnapshotExporter},
    units::Conversion,
};

/// Failures of the in-memory collaborators
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Replay source has no readings left
    #[error("Replay exhausted")]
    Exhausted,

    /// No config has been stored yet
    #[error("No config stored")]
    Empty,

    /// Store was told to reject writes
    #[error("Write rejected")]
    Rejected,
}

/// Replays recorded readings one per fetch
///
/// Readings are recorded in one unit system and converted on the way out
/// when the caller asks for the other one.
#[derive(Debug)]
pub struct ReplaySource<'a> {
    readings: &'a [Reading],
    recorded_in: UnitSystem,
    position: Cell<usize>,
}

impl<'a> ReplaySource<'a> {
    /// Replay `readings` (oldest first) recorded in `recorded_in`
    pub fn new(readings: &'a [Reading], recorded_in: UnitSystem) -> Self {
        Self {
            readings,
            recorded_in,
            position: Cell::new(0),
        }
    }

    /// Reset to beginning
    pub fn reset(&self) {
        self.position.set(0);
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.position.get()
    }

    /// Check if every reading has been fetched
    pub fn is_exhausted(&self) -> bool {
        self.position.get() >= self.readings.len()
    }
}

impl<'a> ReadingSource for ReplaySource<'a> {
    type Error = MemoryError;

    fn fetch_reading(&self, units: &Units) -> Result<Reading, Self::Error> {
        let position = self.position.get();
        let mut reading = self.readings.get(position).cloned().ok_or(MemoryError::Exhausted)?;
        self.position.set(position + 1);

        if units.system() != self.recorded_in {
            Conversion::from_system(self.recorded_in).apply_to_reading(&mut reading);
        }
        Ok(reading)
    }
}

/// Config store backed by a cell
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    stored: RefCell<Option<ThresholdConfig>>,
    reject_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryConfigStore {
    /// Empty store; `load` fails until something is saved
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `config`
    pub fn with_config(config: ThresholdConfig) -> Self {
        Self {
            stored: RefCell::new(Some(config)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail with [`MemoryError::Rejected`]
    pub fn reject_saves(&self, reject: bool) {
        self.reject_saves.set(reject);
    }

    /// Copy of the stored config
    pub fn stored(&self) -> Option<ThresholdConfig> {
        self.stored.borrow().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ConfigStore for MemoryConfigStore {
    type Error = MemoryError;

    fn load(&self) -> Result<ThresholdConfig, Self::Error> {
        self.stored.borrow().clone().ok_or(MemoryError::Empty)
    }

    fn save(&self, config: &ThresholdConfig) -> Result<(), Self::Error> {
        if self.reject_saves.get() {
            return Err(MemoryError::Rejected);
        }
        *self.stored.borrow_mut() = Some(config.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Exporter that keeps every snapshot it is given
#[derive(Debug, Default)]
pub struct MemoryExporter {
    exports: Vec<Vec<Reading>>,
    reject: bool,
}

impl MemoryExporter {
    /// Exporter that accepts every snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter that rejects every snapshot
    pub fn rejecting() -> Self {
        Self { exports: Vec::new(), reject: true }
    }

    /// Snapshots received so far, each newest first
    pub fn exports(&self) -> &[Vec<Reading>] {
        &self.exports
    }
}

impl SnapshotExporter for MemoryExporter {
    type Error = MemoryError;

    fn export(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error> {
        if self.reject {
            return Err(MemoryError::Rejected);
        }
        self.exports.push(snapshot.iter().cloned().collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::reading;

    #[test]
    fn replay_in_order_then_exhausted() {
        let recorded = [reading(1), reading(2)];
        let source = ReplaySource::new(&recorded, UnitSystem::Metric);
        let units = Units::default();

        assert_eq!(source.fetch_reading(&units).unwrap().timestamp, 1);
        assert_eq!(source.fetch_reading(&units).unwrap().timestamp, 2);
        assert_eq!(source.fetch_reading(&units), Err(MemoryError::Exhausted));
        assert_eq!(source.position(), 2);

        source.reset();
        assert_eq!(source.fetch_reading(&units).unwrap().timestamp, 1);
    }

    #[test]
    fn replay_converts_to_requested_units() {
        let mut r = reading(1);
        r.temperature.current = 100.0;
        let recorded = [r];
        let source = ReplaySource::new(&recorded, UnitSystem::Metric);

        let imperial = Units::for_system(UnitSystem::Imperial);
        assert_eq!(source.fetch_reading(&imperial).unwrap().temperature.current, 212.0);
    }

    #[test]
    fn store_round_trip_and_rejection() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.load(), Err(MemoryError::Empty));

        store.save(&ThresholdConfig::default()).unwrap();
        assert_eq!(store.load().unwrap(), ThresholdConfig::default());
        assert_eq!(store.save_count(), 1);

        store.reject_saves(true);
        assert_eq!(store.save(&ThresholdConfig::default()), Err(MemoryError::Rejected));
        assert_eq!(store.save_count(), 1);
    }
}
