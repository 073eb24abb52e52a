//! Normalized Station Readings
//!
//! A [`Reading`] is one snapshot of the weather station, already mapped out of
//! the provider's wire format by the fetch collaborator. All numeric fields are
//! in the measurement system currently active in the
//! [`ThresholdConfig`](crate::ThresholdConfig) units record.
//!
//! Readings are never edited after they enter the history, with one exception:
//! a unit-system flip rewrites the numeric fields of every stored reading in
//! place (see [`units`](crate::units)).
//!
//! ## Serialized shape
//!
//! ```text
//! {
//!   "timestamp": 1718000000,
//!   "temperature": { "current": 18.0, "dew_point": 12.0 },
//!   "conditions": "Clear",
//!   "chance_rain": 0.0,
//!   "humidity": 68.0,
//!   "wind": { "speed": 2.0, "direction": 270, "cardinal_direction": "W", "gust": 4.0 },
//!   "pressure": { "sea_level": 1016.4, "trend": "steady" }
//! }
//! ```
//!
//! Older exports named the timestamp `time`; both keys are accepted on input.

use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch
pub type EpochSeconds = u64;

/// One normalized weather station snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Observation time
    #[serde(alias = "time")]
    pub timestamp: EpochSeconds,

    /// Air temperature and dew point
    pub temperature: TemperatureReading,

    /// Provider's free-text conditions ("Clear", "Rain Likely", ...)
    pub conditions: String,

    /// Chance of precipitation, 0-100
    pub chance_rain: f64,

    /// Relative humidity, 0-100
    pub humidity: f64,

    /// Wind speed, direction and gust
    pub wind: WindReading,

    /// Sea-level pressure and the provider's trend label
    pub pressure: PressureReading,
}

/// Air temperature and dew point (°C or °F)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Air temperature
    pub current: f64,
    /// Dew point temperature
    pub dew_point: f64,
}

impl TemperatureReading {
    /// Distance between air temperature and dew point
    ///
    /// Small spreads mean condensation on optics is likely.
    pub fn spread(&self) -> f64 {
        libm::fabs(self.current - self.dew_point)
    }
}

/// Wind measurements (m/s or mph)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    /// Average speed
    pub speed: f64,
    /// Direction in degrees from north
    pub direction: u16,
    /// Compass label for `direction` ("NNE", ...)
    pub cardinal_direction: String,
    /// Peak gust
    pub gust: f64,
}

/// Pressure measurements (mb or inHg)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureReading {
    /// Pressure reduced to sea level
    pub sea_level: f64,
    /// Provider's trend label ("rising", "steady", "falling")
    pub trend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_JSON: &str = r#"{
        "time": 1718000000,
        "temperature": { "current": 64, "dew_point": 52 },
        "conditions": "Clear",
        "chance_rain": 0,
        "humidity": 65,
        "wind": { "speed": 4, "direction": 270, "cardinal_direction": "W", "gust": 9 },
        "pressure": { "sea_level": 30.01, "trend": "falling" }
    }"#;

    #[test]
    fn legacy_time_key_is_accepted() {
        let reading: Reading = serde_json::from_str(LEGACY_JSON).unwrap();
        assert_eq!(reading.timestamp, 1_718_000_000);
        assert_eq!(reading.wind.cardinal_direction, "W");
        assert_eq!(reading.pressure.trend, "falling");
    }

    #[test]
    fn serializes_with_timestamp_key() {
        let reading: Reading = serde_json::from_str(LEGACY_JSON).unwrap();
        let value = serde_json::to_value(&reading).unwrap();
        assert!(value.get("timestamp").is_some());
        assert!(value.get("time").is_none());
        assert_eq!(value["pressure"]["sea_level"], 30.01);
    }

    #[test]
    fn spread_is_absolute() {
        let temp = TemperatureReading { current: 10.0, dew_point: 12.5 };
        assert_eq!(temp.spread(), 2.5);
    }
}
