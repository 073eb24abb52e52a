//! Threshold Configuration and the Active Unit System
//!
//! ## Overview
//!
//! [`ThresholdConfig`] holds the Red/Yellow boundaries for each monitored
//! metric, the trend windows for humidity and pressure, and the [`Units`]
//! record that says which measurement system every number is expressed in.
//! The units record is the single source of truth: thresholds here and every
//! reading in the [`History`](crate::History) always use the same system.
//! Only a unit flip ([`units::toggle_units`](crate::units::toggle_units) or
//! [`Station::toggle_units`](crate::Station::toggle_units)) changes it.
//!
//! ## Comparison Direction
//!
//! Each metric has a worse side. A value exactly on a boundary takes the
//! worse level:
//!
//! | Metric      | Value compared             | Worse when  |
//! |-------------|----------------------------|-------------|
//! | temperature | air temp minus dew point   | `<=` (small spread means dew) |
//! | rain        | chance of rain             | `>=`        |
//! | humidity    | humidity slope             | `>=` (rising humidity) |
//! | pressure    | pressure slope             | `<=` (falling pressure) |
//! | wind        | average wind speed         | `>=`        |
//!
//! ## Serialized Shape
//!
//! ```text
//! {
//!   "temperature": { "yellow": 3.0, "red": 2.0 },
//!   "rain":        { "yellow": 20.0, "red": 50.0 },
//!   "humidity":    { "yellow": 0.25, "red": 0.5, "n": 10 },
//!   "pressure":    { "yellow": -0.3, "red": -1.0, "n": 10 },
//!   "wind":        { "yellow": 5.0, "red": 9.0 },
//!   "units":       { "metric": true, "temp": "c", "wind": "mps", "pressure": "mb" }
//! }
//! ```
//!
//! ## Mutation
//!
//! Settings change only through validated setters:
//!
//! ```rust
//! use skywatch_core::{Level, Metric, ThresholdConfig};
//!
//! let mut config = ThresholdConfig::default();
//! config.set_threshold(Metric::Rain, Level::Red, 60.0)?;
//! config.set_window("humidity".parse()?, 5)?;
//!
//! // Green is the absence of a boundary, not a setting
//! assert!(config.set_threshold(Metric::Rain, Level::Green, 1.0).is_err());
//! // Only trend metrics have a window
//! assert!(config.set_window(Metric::Wind, 5).is_err());
//! # Ok::<(), skywatch_core::EngineError>(())
//! ```

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    classifier::Level,
    constants::thresholds::*,
    errors::{EngineError, EngineResult},
};

/// Metrics evaluated by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Spread between air temperature and dew point
    Temperature,
    /// Chance of rain
    Rain,
    /// Humidity trend slope
    Humidity,
    /// Pressure trend slope
    Pressure,
    /// Average wind speed
    Wind,
}

impl Metric {
    /// All metrics in report order
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Rain,
        Metric::Humidity,
        Metric::Pressure,
        Metric::Wind,
    ];

    /// Lowercase name, as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Rain => "rain",
            Self::Humidity => "humidity",
            Self::Pressure => "pressure",
            Self::Wind => "wind",
        }
    }

    /// Which side of a boundary is worse for this metric
    pub fn comparison(&self) -> Comparison {
        match self {
            Self::Temperature | Self::Pressure => Comparison::AtMost,
            Self::Rain | Self::Humidity | Self::Wind => Comparison::AtLeast,
        }
    }

    /// Check if this metric is computed from a history window
    pub fn is_trend(&self) -> bool {
        matches!(self, Self::Humidity | Self::Pressure)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(s))
            .ok_or(EngineError::UnknownMetric)
    }
}

/// Direction of a threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Values at or above a boundary are worse
    AtLeast,
    /// Values at or below a boundary are worse
    AtMost,
}

impl Comparison {
    /// Check if `value` is on the worse side of `boundary` (inclusive)
    pub fn reaches(&self, value: f64, boundary: f64) -> bool {
        match self {
            Self::AtLeast => value >= boundary,
            Self::AtMost => value <= boundary,
        }
    }
}

/// Yellow and Red boundaries for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Boundary of the caution band
    pub yellow: f64,
    /// Boundary of the unusable band
    pub red: f64,
}

impl Threshold {
    /// Classify `value`, checking Red first so boundaries resolve to the worse level
    pub fn level(&self, value: f64, comparison: Comparison) -> Level {
        if comparison.reaches(value, self.red) {
            Level::Red
        } else if comparison.reaches(value, self.yellow) {
            Level::Yellow
        } else {
            Level::Green
        }
    }
}

/// Boundaries plus the number of samples in the trend window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowedThreshold {
    /// Boundary of the caution band
    pub yellow: f64,
    /// Boundary of the unusable band
    pub red: f64,
    /// Samples used for the trend slope
    pub n: usize,
}

impl WindowedThreshold {
    /// Boundaries without the window
    pub fn threshold(&self) -> Threshold {
        Threshold { yellow: self.yellow, red: self.red }
    }
}

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// °C, m/s, mb
    Metric,
    /// °F, mph, inHg
    Imperial,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        })
    }
}

/// Temperature unit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempUnit {
    /// Celsius
    #[serde(rename = "c")]
    Celsius,
    /// Fahrenheit
    #[serde(rename = "f")]
    Fahrenheit,
}

/// Wind speed unit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindUnit {
    /// Metres per second
    #[serde(rename = "mps")]
    MetresPerSecond,
    /// Miles per hour
    #[serde(rename = "mph")]
    MilesPerHour,
}

/// Pressure unit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    /// Millibars (hPa)
    #[serde(rename = "mb")]
    Millibar,
    /// Inches of mercury
    #[serde(rename = "inhg")]
    InchesOfMercury,
}

impl TempUnit {
    /// Query-string label ("c" / "f")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "c",
            Self::Fahrenheit => "f",
        }
    }
}

impl WindUnit {
    /// Query-string label ("mps" / "mph")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetresPerSecond => "mps",
            Self::MilesPerHour => "mph",
        }
    }
}

impl PressureUnit {
    /// Query-string label ("mb" / "inhg")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Millibar => "mb",
            Self::InchesOfMercury => "inhg",
        }
    }
}

/// Active measurement system and its unit labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    /// True for metric, false for imperial
    pub metric: bool,
    /// Temperature unit
    pub temp: TempUnit,
    /// Wind speed unit
    pub wind: WindUnit,
    /// Pressure unit
    pub pressure: PressureUnit,
}

impl Units {
    /// Labels for `system`
    pub fn for_system(system: UnitSystem) -> Self {
        match system {
            UnitSystem::Metric => Self {
                metric: true,
                temp: TempUnit::Celsius,
                wind: WindUnit::MetresPerSecond,
                pressure: PressureUnit::Millibar,
            },
            UnitSystem::Imperial => Self {
                metric: false,
                temp: TempUnit::Fahrenheit,
                wind: WindUnit::MilesPerHour,
                pressure: PressureUnit::InchesOfMercury,
            },
        }
    }

    /// System named by the `metric` flag
    pub fn system(&self) -> UnitSystem {
        if self.metric {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    /// Check that every label belongs to the system named by `metric`
    pub fn is_consistent(&self) -> bool {
        *self == Self::for_system(self.system())
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::for_system(UnitSystem::Metric)
    }
}

/// Per-metric thresholds plus the active unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Dew point spread boundaries
    pub temperature: Threshold,
    /// Rain chance boundaries
    pub rain: Threshold,
    /// Humidity slope boundaries and window
    pub humidity: WindowedThreshold,
    /// Pressure slope boundaries and window
    pub pressure: WindowedThreshold,
    /// Wind speed boundaries
    pub wind: Threshold,
    /// Measurement system of every number above and of the stored history
    pub units: Units,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            temperature: Threshold { yellow: TEMP_SPREAD_YELLOW_C, red: TEMP_SPREAD_RED_C },
            rain: Threshold { yellow: RAIN_YELLOW_PCT, red: RAIN_RED_PCT },
            humidity: WindowedThreshold {
                yellow: HUMIDITY_SLOPE_YELLOW,
                red: HUMIDITY_SLOPE_RED,
                n: HUMIDITY_WINDOW,
            },
            pressure: WindowedThreshold {
                yellow: PRESSURE_SLOPE_YELLOW_MB,
                red: PRESSURE_SLOPE_RED_MB,
                n: PRESSURE_WINDOW,
            },
            wind: Threshold { yellow: WIND_YELLOW_MPS, red: WIND_RED_MPS },
            units: Units::default(),
        }
    }
}

impl ThresholdConfig {
    /// Boundaries for `metric`
    pub fn threshold(&self, metric: Metric) -> Threshold {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Rain => self.rain,
            Metric::Humidity => self.humidity.threshold(),
            Metric::Pressure => self.pressure.threshold(),
            Metric::Wind => self.wind,
        }
    }

    /// Trend window for `metric`, if it has one
    pub fn window(&self, metric: Metric) -> Option<usize> {
        match metric {
            Metric::Humidity => Some(self.humidity.n),
            Metric::Pressure => Some(self.pressure.n),
            _ => None,
        }
    }

    /// Set the Yellow or Red boundary of `metric`
    pub fn set_threshold(&mut self, metric: Metric, level: Level, value: f64) -> EngineResult<()> {
        if !value.is_finite() {
            return Err(EngineError::InvalidThreshold { metric, reason: "value is not a finite number" });
        }

        let (yellow, red) = self.boundaries_mut(metric);
        match level {
            Level::Yellow => *yellow = value,
            Level::Red => *red = value,
            Level::Green => {
                return Err(EngineError::InvalidThreshold {
                    metric,
                    reason: "only yellow and red boundaries can be set",
                })
            }
        }

        log_debug!("{} {} threshold set to {}", metric, level, value);
        Ok(())
    }

    /// Set the trend window of a humidity or pressure metric
    pub fn set_window(&mut self, metric: Metric, n: usize) -> EngineResult<()> {
        if n == 0 {
            return Err(EngineError::InvalidWindow);
        }

        match metric {
            Metric::Humidity => self.humidity.n = n,
            Metric::Pressure => self.pressure.n = n,
            _ => {
                return Err(EngineError::InvalidThreshold {
                    metric,
                    reason: "window only applies to trend metrics",
                })
            }
        }

        log_debug!("{} window set to {}", metric, n);
        Ok(())
    }

    /// Check a loaded or edited config before it is used
    ///
    /// Boundary ordering is not enforced; a Yellow boundary on the worse side
    /// of Red simply means the Yellow band is never reported.
    pub fn validate(&self) -> EngineResult<()> {
        for metric in Metric::ALL {
            let threshold = self.threshold(metric);
            if !threshold.yellow.is_finite() || !threshold.red.is_finite() {
                return Err(EngineError::InvalidThreshold {
                    metric,
                    reason: "value is not a finite number",
                });
            }
            if self.window(metric) == Some(0) {
                return Err(EngineError::InvalidWindow);
            }
        }

        if !self.units.is_consistent() {
            return Err(EngineError::InconsistentUnits);
        }

        Ok(())
    }

    fn boundaries_mut(&mut self, metric: Metric) -> (&mut f64, &mut f64) {
        match metric {
            Metric::Temperature => (&mut self.temperature.yellow, &mut self.temperature.red),
            Metric::Rain => (&mut self.rain.yellow, &mut self.rain.red),
            Metric::Humidity => (&mut self.humidity.yellow, &mut self.humidity.red),
            Metric::Pressure => (&mut self.pressure.yellow, &mut self.pressure.red),
            Metric::Wind => (&mut self.wind.yellow, &mut self.wind.red),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_metric() {
        let config = ThresholdConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.units.system(), UnitSystem::Metric);
    }

    #[test]
    fn boundaries_resolve_to_worse_level() {
        let rain = Threshold { yellow: 20.0, red: 50.0 };
        assert_eq!(rain.level(50.0, Comparison::AtLeast), Level::Red);
        assert_eq!(rain.level(20.0, Comparison::AtLeast), Level::Yellow);
        assert_eq!(rain.level(19.0, Comparison::AtLeast), Level::Green);

        let pressure = Threshold { yellow: -0.3, red: -1.0 };
        assert_eq!(pressure.level(-1.0, Comparison::AtMost), Level::Red);
        assert_eq!(pressure.level(-0.3, Comparison::AtMost), Level::Yellow);
        assert_eq!(pressure.level(0.0, Comparison::AtMost), Level::Green);
    }

    #[test]
    fn metric_names_parse() {
        assert_eq!("humidity".parse::<Metric>(), Ok(Metric::Humidity));
        assert_eq!(" Wind ".parse::<Metric>(), Ok(Metric::Wind));
        assert_eq!("visibility".parse::<Metric>(), Err(EngineError::UnknownMetric));
    }

    #[test]
    fn set_threshold_rejects_nan_and_green() {
        let mut config = ThresholdConfig::default();
        assert!(config.set_threshold(Metric::Wind, Level::Red, f64::NAN).is_err());
        assert!(config.set_threshold(Metric::Wind, Level::Green, 3.0).is_err());
        assert_eq!(config.wind, ThresholdConfig::default().wind);

        config.set_threshold(Metric::Wind, Level::Yellow, 6.0).unwrap();
        assert_eq!(config.wind.yellow, 6.0);
    }

    #[test]
    fn window_only_for_trend_metrics() {
        let mut config = ThresholdConfig::default();
        config.set_window(Metric::Pressure, 4).unwrap();
        assert_eq!(config.window(Metric::Pressure), Some(4));

        assert_eq!(config.set_window(Metric::Humidity, 0), Err(EngineError::InvalidWindow));
        assert!(matches!(
            config.set_window(Metric::Rain, 3),
            Err(EngineError::InvalidThreshold { metric: Metric::Rain, .. })
        ));
        assert_eq!(config.window(Metric::Rain), None);
    }

    #[test]
    fn inconsistent_units_rejected() {
        let mut config = ThresholdConfig::default();
        config.units.wind = WindUnit::MilesPerHour;
        assert_eq!(config.validate(), Err(EngineError::InconsistentUnits));
    }

    #[test]
    fn json_shape_round_trips() {
        let json = r#"{
            "temperature": { "yellow": 5, "red": 3 },
            "rain": { "yellow": 20, "red": 50 },
            "humidity": { "yellow": 0.25, "red": 0.5, "n": 10 },
            "pressure": { "yellow": -0.01, "red": -0.03, "n": 10 },
            "wind": { "yellow": 10, "red": 20 },
            "units": { "metric": false, "temp": "f", "wind": "mph", "pressure": "inhg" }
        }"#;

        let config: ThresholdConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.units, Units::for_system(UnitSystem::Imperial));
        assert_eq!(config.humidity.n, 10);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["units"]["pressure"], "inhg");
        assert_eq!(value["pressure"]["n"], 10);
    }
}
