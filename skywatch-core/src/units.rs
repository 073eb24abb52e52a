//! Unit Coordinator: Flipping the Measurement System Consistently
//!
//! ## Overview
//!
//! The config's [`Units`] record names the measurement system of every
//! threshold *and* every stored reading. Flipping it is only correct if both
//! sides move together, so the flip is one operation over both:
//!
//! ```text
//!                toggle_units(config, history)
//!                           │
//!        ┌──────────────────┴──────────────────┐
//!        ▼                                     ▼
//!  ThresholdConfig                          History
//!  temperature ×1.8 (spread, no offset)     temperature ×1.8 + 32
//!  wind        ×2.23694                     wind speed/gust ×2.23694
//!  pressure    ÷33.864                      sea-level pressure ÷33.864
//!  units       → imperial                   (every reading)
//! ```
//!
//! Imperial to metric applies the inverse of each formula.
//!
//! ## Rounding
//!
//! - temperatures, temperature thresholds, wind speeds, wind thresholds:
//!   whole numbers
//! - pressures and pressure thresholds: two decimal places
//!
//! A metric → imperial → metric round trip therefore returns every value to
//! within half a unit of its original (integer Celsius and m/s values come
//! back exactly). Because thresholds and readings move together, the levels
//! a classification assigns survive the round trip up to that rounding.
//!
//! ## What Does Not Change
//!
//! Humidity, rain chance, wind direction, trend windows and the humidity
//! slope thresholds are unit-free.
//!
//! ## Exclusivity
//!
//! Both arguments are borrowed mutably, so no classification or append can
//! observe a half-converted state. Callers must re-run the classifier
//! afterwards; [`Station::toggle_units`](crate::Station::toggle_units) does
//! the invalidation and persistence for you.

use crate::{
    buffer::History,
    config::{ThresholdConfig, UnitSystem, Units},
    constants::{FAHRENHEIT_OFFSET, FAHRENHEIT_PER_CELSIUS, MB_PER_INHG, MPH_PER_MPS, PRESSURE_DECIMALS},
    reading::Reading,
    utils::round_to,
};

/// Direction of a unit-system flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// °C → °F, m/s → mph, mb → inHg
    MetricToImperial,
    /// °F → °C, mph → m/s, inHg → mb
    ImperialToMetric,
}

impl Conversion {
    /// Conversion that leaves `from`
    pub fn from_system(from: UnitSystem) -> Self {
        match from {
            UnitSystem::Metric => Self::MetricToImperial,
            UnitSystem::Imperial => Self::ImperialToMetric,
        }
    }

    /// System reached after converting
    pub fn target(&self) -> UnitSystem {
        match self {
            Self::MetricToImperial => UnitSystem::Imperial,
            Self::ImperialToMetric => UnitSystem::Metric,
        }
    }

    /// Absolute temperature, rounded to a whole degree
    pub fn temperature(&self, value: f64) -> f64 {
        round_to(
            match self {
                Self::MetricToImperial => value * FAHRENHEIT_PER_CELSIUS + FAHRENHEIT_OFFSET,
                Self::ImperialToMetric => (value - FAHRENHEIT_OFFSET) / FAHRENHEIT_PER_CELSIUS,
            },
            0,
        )
    }

    /// Temperature difference, rounded to a whole degree
    pub fn temperature_delta(&self, value: f64) -> f64 {
        round_to(
            match self {
                Self::MetricToImperial => value * FAHRENHEIT_PER_CELSIUS,
                Self::ImperialToMetric => value / FAHRENHEIT_PER_CELSIUS,
            },
            0,
        )
    }

    /// Wind speed, rounded to a whole unit
    pub fn wind(&self, value: f64) -> f64 {
        round_to(
            match self {
                Self::MetricToImperial => value * MPH_PER_MPS,
                Self::ImperialToMetric => value / MPH_PER_MPS,
            },
            0,
        )
    }

    /// Pressure or pressure slope, rounded to two decimals
    pub fn pressure(&self, value: f64) -> f64 {
        round_to(
            match self {
                Self::MetricToImperial => value / MB_PER_INHG,
                Self::ImperialToMetric => value * MB_PER_INHG,
            },
            PRESSURE_DECIMALS,
        )
    }

    /// Rewrite the thresholds of `config` and relabel its units
    pub fn apply_to_config(&self, config: &mut ThresholdConfig) {
        config.temperature.yellow = self.temperature_delta(config.temperature.yellow);
        config.temperature.red = self.temperature_delta(config.temperature.red);
        config.wind.yellow = self.wind(config.wind.yellow);
        config.wind.red = self.wind(config.wind.red);
        config.pressure.yellow = self.pressure(config.pressure.yellow);
        config.pressure.red = self.pressure(config.pressure.red);
        config.units = Units::for_system(self.target());
    }

    /// Rewrite the numeric fields of one reading
    pub fn apply_to_reading(&self, reading: &mut Reading) {
        reading.temperature.current = self.temperature(reading.temperature.current);
        reading.temperature.dew_point = self.temperature(reading.temperature.dew_point);
        reading.wind.speed = self.wind(reading.wind.speed);
        reading.wind.gust = self.wind(reading.wind.gust);
        reading.pressure.sea_level = self.pressure(reading.pressure.sea_level);
    }

    /// Rewrite every reading in `history`
    pub fn apply_to_history(&self, history: &mut History) {
        for reading in history.readings_mut() {
            self.apply_to_reading(reading);
        }
    }
}

/// Flip the measurement system of `config` and every reading in `history`
///
/// Returns the newly active system. Persisting the config is left to the
/// caller.
///
/// ```rust
/// use skywatch_core::{units, History, ThresholdConfig, UnitSystem};
/// # use skywatch_core::testing::reading;
///
/// let mut config = ThresholdConfig::default();
/// let mut history = History::new(5)?;
/// let mut r = reading(1);
/// r.temperature.current = 20.0;
/// history.initialize(r)?;
///
/// assert_eq!(units::toggle_units(&mut config, &mut history), UnitSystem::Imperial);
/// assert_eq!(history.at(0)?.temperature.current, 68.0);
/// assert!(!config.units.metric);
/// # Ok::<(), skywatch_core::EngineError>(())
/// ```
pub fn toggle_units(config: &mut ThresholdConfig, history: &mut History) -> UnitSystem {
    let conversion = Conversion::from_system(config.units.system());
    conversion.apply_to_config(config);
    conversion.apply_to_history(history);

    log_info!(
        "units switched to {} ({} readings converted)",
        conversion.target(),
        history.len()
    );
    conversion.target()
}
