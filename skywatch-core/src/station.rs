//! Station: the orchestrating owner of config, history and classifier
//!
//! ## Overview
//!
//! [`Station`] is the single owner the engine expects: it holds the
//! [`ThresholdConfig`], the [`History`] and the [`Classifier`], and talks to
//! the config store it was given. All mutating operations take `&mut self`,
//! so a unit flip can never interleave with an append or an evaluation.
//!
//! ```text
//!   ReadingSource ──fetch(units)──► ingest ──► History ──┐
//!                                                       ├──► evaluate ──► Classification
//!   ConfigStore ◄──load/save──► ThresholdConfig ────────┘
//!                                    ▲
//!                         toggle_units (config + history together)
//!
//!   SnapshotExporter ◄── export (read-only)
//! ```
//!
//! ## Cache Invalidation
//!
//! Accepting a reading, editing a threshold, loading a config and flipping
//! units all drop the cached classification; the next
//! [`Station::classification`] call re-evaluates.
//!
//! ## Failure Atomicity
//!
//! - `load_config`: a failed or invalid load keeps the previous config
//! - `toggle_units`: converted thresholds are saved before anything in memory
//!   changes; if the save fails, config and history are untouched
//! - `export`: never mutates; failures are logged and returned

use crate::{
    buffer::History,
    classifier::{Classification, Classifier, Level},
    config::{Metric, ThresholdConfig, UnitSystem, Units},
    errors::{EngineError, EngineResult, StationError},
    reading::Reading,
    traits::{ConfigStore, ReadingSource, SnapshotExporter},
    units::Conversion,
};

/// Single owner of config, history and classification state
#[derive(Debug)]
pub struct Station<C> {
    store: C,
    config: Option<ThresholdConfig>,
    history: History,
    classifier: Classifier,
}

impl<C: ConfigStore> Station<C> {
    /// Station with an empty history of `capacity` readings and no config loaded
    pub fn new(store: C, capacity: usize) -> EngineResult<Self> {
        Ok(Self {
            store,
            config: None,
            history: History::new(capacity)?,
            classifier: Classifier::new(),
        })
    }

    /// Load and validate the config from the store
    ///
    /// Units may only change through [`toggle_units`](Self::toggle_units):
    /// once history exists, a loaded config in a different system than the
    /// history's (metric if no config was loaded yet) is rejected with
    /// [`EngineError::InconsistentUnits`].
    pub fn load_config(&mut self) -> Result<&ThresholdConfig, StationError<C::Error>> {
        let loaded = self.store.load().map_err(StationError::Collaborator)?;
        loaded.validate()?;

        self.check_history_units(&loaded)?;

        log_info!("config loaded ({} units)", loaded.units.system());
        self.classifier.invalidate();
        Ok(self.config.insert(loaded))
    }

    /// Use `config` directly, bypassing the store
    pub fn set_config(&mut self, config: ThresholdConfig) -> EngineResult<()> {
        config.validate()?;
        self.check_history_units(&config)?;
        self.config = Some(config);
        self.classifier.invalidate();
        Ok(())
    }

    /// Persist the current config through the store
    pub fn save_config(&self) -> Result<(), StationError<C::Error>> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigMissing)?;
        self.store.save(config).map_err(StationError::Collaborator)?;
        log_debug!("config saved");
        Ok(())
    }

    /// Set a Yellow or Red boundary (in memory; call [`save_config`](Self::save_config) to persist)
    pub fn set_threshold(&mut self, metric: Metric, level: Level, value: f64) -> EngineResult<()> {
        self.config_mut()?.set_threshold(metric, level, value)?;
        self.classifier.invalidate();
        Ok(())
    }

    /// Set a trend window (in memory; call [`save_config`](Self::save_config) to persist)
    pub fn set_window(&mut self, metric: Metric, n: usize) -> EngineResult<()> {
        self.config_mut()?.set_window(metric, n)?;
        self.classifier.invalidate();
        Ok(())
    }

    /// Add a reading: the first one initializes the history, later ones append
    ///
    /// The reading must already be in the active unit system.
    pub fn accept(&mut self, reading: Reading) -> EngineResult<()> {
        if self.history.is_initialized() {
            self.history.append(reading)?;
        } else {
            self.history.initialize(reading)?;
            log_info!("history initialized");
        }
        self.classifier.invalidate();
        Ok(())
    }

    /// Fetch one reading in the active units and accept it
    ///
    /// Fetch failures are returned unchanged and leave the history as it was.
    pub fn ingest<S: ReadingSource>(&mut self, source: &S) -> Result<(), StationError<S::Error>> {
        let reading = source.fetch_reading(&self.units()).map_err(StationError::Collaborator)?;
        self.accept(reading)?;
        Ok(())
    }

    /// Classify the current history against the current config
    pub fn evaluate(&mut self) -> EngineResult<Classification> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigMissing)?;
        self.classifier.evaluate(&self.history, config)
    }

    /// Cached classification, evaluating first if nothing is cached
    pub fn classification(&mut self) -> EngineResult<Classification> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigMissing)?;
        self.classifier.classification(&self.history, config)
    }

    /// Flip the unit system of config and history, persisting the config
    ///
    /// Returns the newly active system.
    pub fn toggle_units(&mut self) -> Result<UnitSystem, StationError<C::Error>> {
        let config = self.config.as_mut().ok_or(EngineError::ConfigMissing)?;
        let conversion = Conversion::from_system(config.units.system());

        let mut staged = config.clone();
        conversion.apply_to_config(&mut staged);
        self.store.save(&staged).map_err(StationError::Collaborator)?;

        *config = staged;
        conversion.apply_to_history(&mut self.history);
        self.classifier.invalidate();

        log_info!(
            "units switched to {} ({} readings converted, config saved)",
            conversion.target(),
            self.history.len()
        );
        Ok(conversion.target())
    }

    /// Hand a read-only snapshot of the history to `exporter`
    pub fn export<E: SnapshotExporter>(&self, exporter: &mut E) -> Result<(), E::Error> {
        let result = exporter.export(self.history.snapshot());
        if result.is_err() {
            log_warn!("history export failed ({} readings kept in memory)", self.history.len());
        }
        result
    }

    /// Active unit labels (metric until a config is loaded)
    pub fn units(&self) -> Units {
        self.config.as_ref().map(|config| config.units).unwrap_or_default()
    }

    /// Current config, if loaded
    pub fn config(&self) -> Option<&ThresholdConfig> {
        self.config.as_ref()
    }

    /// Rolling history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Classifier state, including the last cached result
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Config store
    pub fn store(&self) -> &C {
        &self.store
    }

    /// Drop all readings, keeping the config
    pub fn reset_history(&mut self) {
        self.history.reset();
        self.classifier.invalidate();
    }

    /// Readings already held are in `self.units()`; a new config must match them
    fn check_history_units(&self, incoming: &ThresholdConfig) -> EngineResult<()> {
        if !self.history.is_empty() && self.units().system() != incoming.units.system() {
            return Err(EngineError::InconsistentUnits);
        }
        Ok(())
    }

    fn config_mut(&mut self) -> EngineResult<&mut ThresholdConfig> {
        self.config.as_mut().ok_or(EngineError::ConfigMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        memory::{MemoryConfigStore, MemoryError, MemoryExporter, ReplaySource},
        testing::{reading, reading_with_rain},
    };

    fn loaded_station() -> Station<MemoryConfigStore> {
        let mut station = Station::new(MemoryConfigStore::with_config(ThresholdConfig::default()), 5).unwrap();
        station.load_config().unwrap();
        station
    }

    #[test]
    fn evaluate_without_config_is_config_missing() {
        let mut station = Station::new(MemoryConfigStore::new(), 5).unwrap();
        station.accept(reading(1)).unwrap();
        assert_eq!(station.evaluate().unwrap_err(), EngineError::ConfigMissing);
        assert_eq!(station.classification().unwrap_err(), EngineError::ConfigMissing);
    }

    #[test]
    fn failed_load_keeps_previous_config() {
        let mut station = loaded_station();
        station.set_threshold(Metric::Rain, Level::Red, 70.0).unwrap();

        let mut broken = ThresholdConfig::default();
        broken.humidity.n = 0;
        station.store().save(&broken).unwrap();

        let err = station.load_config().unwrap_err();
        assert_eq!(err.engine(), Some(EngineError::InvalidWindow));
        assert_eq!(station.config().unwrap().rain.red, 70.0);
    }

    #[test]
    fn evaluate_without_history_is_not_initialized() {
        let mut station = loaded_station();
        assert_eq!(station.evaluate().unwrap_err(), EngineError::NotInitialized);
    }

    #[test]
    fn accept_initializes_then_appends() {
        let mut station = loaded_station();
        station.accept(reading(1)).unwrap();
        station.accept(reading(2)).unwrap();
        assert!(station.history().is_initialized());
        assert_eq!(station.history().at(0).unwrap().timestamp, 2);
    }

    #[test]
    fn new_reading_invalidates_cache() {
        let mut station = loaded_station();
        station.accept(reading_with_rain(1, 0.0)).unwrap();
        assert_eq!(station.classification().unwrap().rain.level, Level::Green);

        station.accept(reading_with_rain(2, 80.0)).unwrap();
        assert!(!station.classifier().is_checked());
        assert_eq!(station.classification().unwrap().rain.level, Level::Red);
    }

    #[test]
    fn threshold_edit_invalidates_cache() {
        let mut station = loaded_station();
        station.accept(reading_with_rain(1, 30.0)).unwrap();
        assert_eq!(station.classification().unwrap().rain.level, Level::Yellow);

        station.set_threshold(Metric::Rain, Level::Red, 30.0).unwrap();
        assert_eq!(station.classification().unwrap().rain.level, Level::Red);
    }

    #[test]
    fn ingest_surfaces_fetch_errors() {
        let mut station = loaded_station();
        let source = ReplaySource::new(&[], UnitSystem::Metric);

        match station.ingest(&source) {
            Err(StationError::Collaborator(MemoryError::Exhausted)) => {}
            other => panic!("expected exhausted source, got {:?}", other),
        }
        assert!(!station.history().is_initialized());
    }

    #[test]
    fn toggle_persists_and_converts() {
        let mut station = loaded_station();
        let mut r = reading(1);
        r.temperature.current = 20.0;
        station.accept(r).unwrap();

        assert_eq!(station.toggle_units().unwrap(), UnitSystem::Imperial);
        assert_eq!(station.history().at(0).unwrap().temperature.current, 68.0);
        assert_eq!(station.store().stored().unwrap().units, Units::for_system(UnitSystem::Imperial));
        assert_eq!(station.units(), Units::for_system(UnitSystem::Imperial));
        assert!(!station.classifier().is_checked());
    }

    #[test]
    fn toggle_with_failed_save_changes_nothing() {
        let mut station = loaded_station();
        station.accept(reading(1)).unwrap();
        let before_config = station.config().cloned();
        let before_reading = station.history().at(0).unwrap().clone();

        station.store().reject_saves(true);
        match station.toggle_units() {
            Err(StationError::Collaborator(MemoryError::Rejected)) => {}
            other => panic!("expected rejected save, got {:?}", other),
        }

        assert_eq!(station.config().cloned(), before_config);
        assert_eq!(station.history().at(0).unwrap(), &before_reading);
    }

    #[test]
    fn toggle_without_config_is_config_missing() {
        let mut station = Station::new(MemoryConfigStore::new(), 5).unwrap();
        let err = station.toggle_units().unwrap_err();
        assert_eq!(err.engine(), Some(EngineError::ConfigMissing));
    }

    #[test]
    fn reload_in_other_system_rejected_once_history_exists() {
        let mut station = loaded_station();
        station.accept(reading(1)).unwrap();

        let mut imperial = ThresholdConfig::default();
        crate::units::Conversion::MetricToImperial.apply_to_config(&mut imperial);
        assert_eq!(station.set_config(imperial), Err(EngineError::InconsistentUnits));
    }

    #[test]
    fn first_load_must_match_history_units() {
        let mut imperial = ThresholdConfig::default();
        crate::units::Conversion::MetricToImperial.apply_to_config(&mut imperial);

        let mut station = Station::new(MemoryConfigStore::with_config(imperial.clone()), 10).unwrap();
        let mut r = reading(1);
        r.temperature.current = 20.0;
        let recorded = [r];
        station.ingest(&ReplaySource::new(&recorded, UnitSystem::Metric)).unwrap();

        let err = station.load_config().unwrap_err();
        assert_eq!(err.engine(), Some(EngineError::InconsistentUnits));
        assert!(station.config().is_none());
        assert_eq!(station.set_config(imperial), Err(EngineError::InconsistentUnits));

        // Metric config matches the metric history
        station.set_config(ThresholdConfig::default()).unwrap();
        assert_eq!(station.toggle_units().unwrap(), UnitSystem::Imperial);
        assert_eq!(station.history().newest().unwrap().temperature.current, 68.0);
    }

    #[test]
    fn first_load_without_history_takes_any_system() {
        let mut imperial = ThresholdConfig::default();
        crate::units::Conversion::MetricToImperial.apply_to_config(&mut imperial);

        let mut station = Station::new(MemoryConfigStore::with_config(imperial), 10).unwrap();
        station.load_config().unwrap();
        assert_eq!(station.units(), Units::for_system(UnitSystem::Imperial));
    }

    #[test]
    fn export_failure_leaves_state() {
        let mut station = loaded_station();
        station.accept(reading(1)).unwrap();

        let mut exporter = MemoryExporter::rejecting();
        assert_eq!(station.export(&mut exporter), Err(MemoryError::Rejected));
        assert_eq!(station.history().len(), 1);

        let mut exporter = MemoryExporter::new();
        station.export(&mut exporter).unwrap();
        assert_eq!(exporter.exports().len(), 1);
    }
}
