//! Reading fixtures for tests, benches and doc examples
//!
//! Hidden from the rendered docs; not part of the supported API.
//!
//! Calm, dry, metric conditions with a single field varied. Every fixture
//! classifies Green under [`ThresholdConfig::default`](crate::ThresholdConfig)
//! except for the field being exercised.

use alloc::string::String;

use crate::{
    buffer::History,
    errors::EngineResult,
    reading::{EpochSeconds, PressureReading, Reading, TemperatureReading, WindReading},
};

/// Calm, clear, metric reading at `timestamp`
pub fn reading(timestamp: EpochSeconds) -> Reading {
    Reading {
        timestamp,
        temperature: TemperatureReading { current: 18.0, dew_point: 8.0 },
        conditions: String::from("Clear"),
        chance_rain: 0.0,
        humidity: 50.0,
        wind: WindReading {
            speed: 1.0,
            direction: 180,
            cardinal_direction: String::from("S"),
            gust: 2.0,
        },
        pressure: PressureReading {
            sea_level: 1016.0,
            trend: String::from("steady"),
        },
    }
}

/// Calm reading with the given relative humidity
pub fn reading_with_humidity(timestamp: EpochSeconds, humidity: f64) -> Reading {
    Reading { humidity, ..reading(timestamp) }
}

/// Calm reading with the given chance of rain
pub fn reading_with_rain(timestamp: EpochSeconds, chance_rain: f64) -> Reading {
    Reading { chance_rain, ..reading(timestamp) }
}

/// History holding one reading per humidity value, inserted oldest first
///
/// Capacity equals the number of values, so nothing is evicted. Timestamps
/// count up from 1. An empty slice fails with
/// [`EngineError::InvalidCapacity`](crate::EngineError::InvalidCapacity).
pub fn history_from_oldest(humidity: &[f64]) -> EngineResult<History> {
    let mut history = History::new(humidity.len())?;
    for (index, value) in humidity.iter().enumerate() {
        let reading = reading_with_humidity(index as EpochSeconds + 1, *value);
        if index == 0 {
            history.initialize(reading)?;
        } else {
            history.append(reading)?;
        }
    }
    Ok(history)
}
