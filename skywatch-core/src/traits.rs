//! Collaborator traits
//!
//! The engine does no I/O of its own. Fetching readings, persisting the
//! config and exporting the history are delegated to implementations of
//! these traits, injected by the caller. Each carries its own error type,
//! which the engine passes back unchanged and never retries.
//!
//! Dependencies point one way: a [`ReadingSource`] is handed the active
//! [`Units`] on every call and only reads them. Unit flips are driven from
//! the engine side, never from the source.

use crate::{
    buffer::Snapshot,
    config::{ThresholdConfig, Units},
    reading::Reading,
};

/// Produces one normalized reading per call
pub trait ReadingSource {
    /// Fetch failure
    type Error;

    /// Fetch the current conditions expressed in `units`
    fn fetch_reading(&self, units: &Units) -> Result<Reading, Self::Error>;
}

/// Loads and saves the threshold config
pub trait ConfigStore {
    /// Load or save failure
    type Error;

    /// Load the stored config
    fn load(&self) -> Result<ThresholdConfig, Self::Error>;

    /// Replace the stored config
    fn save(&self, config: &ThresholdConfig) -> Result<(), Self::Error>;
}

/// Writes a copy of the history somewhere outside the engine
///
/// Export is best-effort: a failure is reported to the caller but never
/// changes in-memory state.
pub trait SnapshotExporter {
    /// Write failure
    type Error;

    /// Export the newest-first history view
    fn export(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error>;
}

impl<T: ReadingSource + ?Sized> ReadingSource for &T {
    type Error = T::Error;

    fn fetch_reading(&self, units: &Units) -> Result<Reading, Self::Error> {
        (**self).fetch_reading(units)
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    type Error = T::Error;

    fn load(&self) -> Result<ThresholdConfig, Self::Error> {
        (**self).load()
    }

    fn save(&self, config: &ThresholdConfig) -> Result<(), Self::Error> {
        (**self).save(config)
    }
}
