//! Polling monitor: fetch, accept, export, sleep
//!
//! ## Overview
//!
//! [`Monitor`] owns a [`Station`] and drives it on a `tokio` interval:
//!
//! ```text
//!   tick ──► fetch (blocking worker) ──► station.accept ──► classification
//!                                                     └──► export snapshot
//! ```
//!
//! The fetch runs on `spawn_blocking` because the Tempest client is a
//! blocking `ureq` agent. Units are read from the station before each fetch,
//! so a reading always arrives in the system the history is kept in.
//!
//! ## Failure Handling
//!
//! Fetch, accept and export failures are logged and counted in
//! [`MonitorStats`]; the loop keeps going. Retrying a fetch is the source's
//! business, not the monitor's.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use skywatch_core::{Classification, ConfigStore, ReadingSource, SnapshotExporter, Station};
use tokio::time::MissedTickBehavior;

/// Monitor schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Time between fetches
    pub interval: Duration,
    /// Stop after this many fetch attempts; `None` runs until shut down
    pub samples: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            samples: Some(10),
        }
    }
}

impl MonitorConfig {
    /// Set the fetch interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set interval in seconds
    pub fn interval_secs(mut self, secs: u64) -> Self {
        self.interval = Duration::from_secs(secs);
        self
    }

    /// Stop after `samples` fetch attempts
    pub fn samples(mut self, samples: u64) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Run until the shutdown handle fires
    pub fn unbounded(mut self) -> Self {
        self.samples = None;
        self
    }
}

/// Counters for one monitor run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MonitorStats {
    /// Fetch attempts made
    pub samples: u64,
    /// Readings added to the history
    pub accepted: u64,
    /// Fetches that failed (including worker panics)
    pub fetch_failures: u64,
    /// Readings the station refused
    pub rejected: u64,
    /// Successful snapshot exports
    pub exports: u64,
    /// Failed snapshot exports
    pub export_failures: u64,
    /// Classification after the latest accepted reading
    pub last_classification: Option<Classification>,
    /// Last error message
    pub last_error: Option<String>,
}

/// Stops a running monitor after its current tick
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the monitor to stop
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Drives a station from a reading source on a fixed interval
pub struct Monitor<S, C, E> {
    source: Arc<S>,
    station: Station<C>,
    exporter: Option<E>,
    config: MonitorConfig,
    shutdown: ShutdownHandle,
}

impl<S, C, E> Monitor<S, C, E>
where
    S: ReadingSource + Send + Sync + 'static,
    S::Error: Display + Send + 'static,
    C: ConfigStore,
    E: SnapshotExporter,
    E::Error: Display,
{
    /// Monitor feeding `station` from `source`
    ///
    /// The station should already have its config loaded; readings are
    /// accepted either way, but no classification is computed without one.
    pub fn new(source: S, station: Station<C>, config: MonitorConfig) -> Self {
        Self {
            source: Arc::new(source),
            station,
            exporter: None,
            config,
            shutdown: ShutdownHandle::default(),
        }
    }

    /// Export the history after every tick
    pub fn with_exporter(mut self, exporter: E) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Handle for stopping the loop from another task
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Reading source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Station being driven
    pub fn station(&self) -> &Station<C> {
        &self.station
    }

    /// Mutable station access between runs (threshold edits, unit flips)
    pub fn station_mut(&mut self) -> &mut Station<C> {
        &mut self.station
    }

    /// Give back the station and exporter
    pub fn into_parts(self) -> (Station<C>, Option<E>) {
        (self.station, self.exporter)
    }

    /// Run until the sample budget is spent or shutdown is requested
    pub async fn run(&mut self) -> MonitorStats {
        let mut stats = MonitorStats::default();
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "monitor started (every {:?}, {})",
            self.config.interval,
            self.config
                .samples
                .map_or_else(|| "unbounded".to_string(), |n| format!("{} samples", n))
        );

        while !self.finished(&stats) {
            interval.tick().await;
            if self.shutdown.is_shutdown() {
                break;
            }
            self.tick(&mut stats).await;
        }

        info!(
            "monitor stopped: {} samples, {} accepted, {} fetch failures, {} export failures",
            stats.samples, stats.accepted, stats.fetch_failures, stats.export_failures
        );
        stats
    }

    fn finished(&self, stats: &MonitorStats) -> bool {
        self.shutdown.is_shutdown() || self.config.samples.is_some_and(|limit| stats.samples >= limit)
    }

    async fn tick(&mut self, stats: &mut MonitorStats) {
        stats.samples += 1;

        let units = self.station.units();
        let source = Arc::clone(&self.source);
        let fetched = tokio::task::spawn_blocking(move || source.fetch_reading(&units).map_err(|e| e.to_string())).await;

        match fetched {
            Ok(Ok(reading)) => match self.station.accept(reading) {
                Ok(()) => {
                    stats.accepted += 1;
                    if self.station.config().is_some() {
                        match self.station.classification() {
                            Ok(classification) => stats.last_classification = Some(classification),
                            Err(err) => warn!("classification failed: {}", err),
                        }
                    }
                }
                Err(err) => {
                    warn!("reading rejected: {}", err);
                    stats.rejected += 1;
                    stats.last_error = Some(err.to_string());
                }
            },
            Ok(Err(err)) => {
                warn!("fetch failed: {}", err);
                stats.fetch_failures += 1;
                stats.last_error = Some(err);
            }
            Err(join) => {
                error!("fetch worker failed: {}", join);
                stats.fetch_failures += 1;
                stats.last_error = Some(join.to_string());
            }
        }

        // Nothing to export before the first accepted reading
        if !self.station.history().is_empty() {
            if let Some(exporter) = self.exporter.as_mut() {
                match self.station.export(exporter) {
                    Ok(()) => stats.exports += 1,
                    Err(err) => {
                        stats.export_failures += 1;
                        stats.last_error = Some(err.to_string());
                    }
                }
            }
        }

        debug!("tick {} done ({} readings held)", stats.samples, self.station.history().len());
    }
}
