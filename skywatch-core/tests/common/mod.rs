//! Shared fixtures for integration tests
//!
//! Builders for stations and recorded weather sequences on top of the
//! in-crate [`skywatch_core::testing`] readings.

#![allow(dead_code)]

use skywatch_core::{
    memory::MemoryConfigStore, testing::reading, EpochSeconds, Reading, Station, ThresholdConfig,
};

/// Station over an in-memory store holding `config`, with the config loaded
pub fn station_with(config: ThresholdConfig, capacity: usize) -> Station<MemoryConfigStore> {
    let mut station = Station::new(MemoryConfigStore::with_config(config), capacity).unwrap();
    station.load_config().unwrap();
    station
}

/// Readings whose humidity follows `start + step * i`, oldest first
pub fn humidity_ramp(count: usize, start: f64, step: f64) -> Vec<Reading> {
    (0..count)
        .map(|i| Reading {
            humidity: start + step * i as f64,
            ..reading(i as EpochSeconds + 1)
        })
        .collect()
}

/// Readings with falling sea-level pressure, oldest first
pub fn pressure_drop(count: usize, start: f64, drop_per_step: f64) -> Vec<Reading> {
    (0..count)
        .map(|i| {
            let mut r = reading(i as EpochSeconds + 1);
            r.pressure.sea_level = start - drop_per_step * i as f64;
            r.pressure.trend = String::from("falling");
            r
        })
        .collect()
}

/// Feed every reading to `station`, oldest first
pub fn accept_all(station: &mut Station<MemoryConfigStore>, readings: &[Reading]) {
    for r in readings {
        station.accept(r.clone()).unwrap();
    }
}
