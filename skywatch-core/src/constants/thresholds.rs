//! Default Classification Thresholds
//!
//! Boundaries used by [`ThresholdConfig::default`](crate::ThresholdConfig),
//! expressed in the metric system. A Red boundary is always on the worse side
//! of its Yellow boundary.

// ===== DEW POINT SPREAD (°C, smaller is worse) =====

/// Spread at or below which optics are at risk of dew.
pub const TEMP_SPREAD_YELLOW_C: f64 = 3.0;

/// Spread at or below which condensation is expected.
pub const TEMP_SPREAD_RED_C: f64 = 2.0;

// ===== RAIN (% chance, larger is worse) =====

/// Rain chance that warrants caution.
pub const RAIN_YELLOW_PCT: f64 = 20.0;

/// Rain chance at which the dome stays closed.
pub const RAIN_RED_PCT: f64 = 50.0;

// ===== HUMIDITY TREND (%RH per sample, larger is worse) =====

/// Rising humidity slope that warrants caution.
pub const HUMIDITY_SLOPE_YELLOW: f64 = 0.25;

/// Rising humidity slope that closes the session.
pub const HUMIDITY_SLOPE_RED: f64 = 0.5;

/// Samples in the humidity trend window.
pub const HUMIDITY_WINDOW: usize = 10;

// ===== PRESSURE TREND (mb per sample, smaller is worse) =====

/// Falling pressure slope that warrants caution.
pub const PRESSURE_SLOPE_YELLOW_MB: f64 = -0.3;

/// Falling pressure slope that closes the session.
pub const PRESSURE_SLOPE_RED_MB: f64 = -1.0;

/// Samples in the pressure trend window.
pub const PRESSURE_WINDOW: usize = 10;

// ===== WIND (m/s, larger is worse) =====

/// Average wind speed that shakes long exposures.
pub const WIND_YELLOW_MPS: f64 = 5.0;

/// Average wind speed at which the telescope is parked.
pub const WIND_RED_MPS: f64 = 9.0;
