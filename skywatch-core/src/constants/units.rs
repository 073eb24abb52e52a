//! Unit Conversion Factors
//!
//! Factors used when the active measurement system flips between metric
//! (°C, m/s, mb) and imperial (°F, mph, inHg).

// ===== TEMPERATURE =====

/// Fahrenheit degrees per Celsius degree.
///
/// Applies on its own to temperature *differences* (dew point spread
/// thresholds). Absolute readings also need [`FAHRENHEIT_OFFSET`].
pub const FAHRENHEIT_PER_CELSIUS: f64 = 1.8;

/// Fahrenheit value of 0 °C.
pub const FAHRENHEIT_OFFSET: f64 = 32.0;

// ===== WIND =====

/// Miles per hour in one metre per second.
pub const MPH_PER_MPS: f64 = 2.23694;

// ===== PRESSURE =====

/// Millibars in one inch of mercury.
pub const MB_PER_INHG: f64 = 33.864;

// ===== ROUNDING =====

/// Decimal places kept for converted pressure values and pressure thresholds.
///
/// Temperature and wind values are rounded to whole numbers.
pub const PRESSURE_DECIMALS: i32 = 2;

/// Decimal places kept for trend slopes.
pub const SLOPE_DECIMALS: i32 = 4;
