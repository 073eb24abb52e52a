//! Least-Squares Trend Slopes over the Rolling History
//!
//! ## Method
//!
//! The slope is an ordinary least-squares fit of a numeric reading field
//! against a synthetic time axis, one unit per stored sample:
//!
//! ```text
//! n   = min(window, history.len())
//! x̄   = mean(x),  ȳ = mean(y)
//! m   = Σ (xᵢ - x̄)(yᵢ - ȳ) / Σ (xᵢ - x̄)²
//! ```
//!
//! The result is rounded to four decimal places.
//!
//! ## Sign Convention
//!
//! The time axis is chronological. Within the sampled window the **oldest**
//! reading sits at `x = 0` and the newest at `x = n - 1`:
//!
//! ```text
//! history index:   0 (newest)   1    ...   n-1 (oldest)
//! x coordinate:    n-1          n-2  ...   0
//! ```
//!
//! A positive slope therefore always means "increasing over time", for every
//! field. Humidity and pressure use the same convention: rising humidity gives
//! a positive slope, falling pressure a negative one.
//!
//! ## Degenerate Windows
//!
//! With fewer than two samples in the window there is no line to fit. The
//! slope is defined as exactly `0.0` rather than reported as an error. For
//! two or more samples the denominator is the variance of `0..n-1`, which is
//! always positive.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    buffer::History,
    constants::SLOPE_DECIMALS,
    errors::{EngineError, EngineResult},
    reading::Reading,
    utils,
};

/// Direction label attached to a trend metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Increasing over time
    Rising,
    /// Within the dead band
    Steady,
    /// Decreasing over time
    Falling,
    /// Not computed yet, or the provider's label was not recognized
    #[default]
    Unknown,
}

impl Trend {
    /// Label a humidity slope using the Yellow threshold as a dead band
    ///
    /// `slope > band` is rising, `slope < -band` is falling, anything in
    /// between is steady.
    pub fn from_slope(slope: f64, band: f64) -> Self {
        if slope > band {
            Self::Rising
        } else if slope < -band {
            Self::Falling
        } else {
            Self::Steady
        }
    }

    /// Parse a provider trend label ("rising", "Falling", ...)
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("rising") {
            Self::Rising
        } else if label.eq_ignore_ascii_case("steady") {
            Self::Steady
        } else if label.eq_ignore_ascii_case("falling") {
            Self::Falling
        } else {
            Self::Unknown
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Steady => "steady",
            Self::Falling => "falling",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Least-squares slope of `field` over the newest `window` readings
///
/// `window` is clamped to the history length. Fails with
/// [`EngineError::NotInitialized`] on an uninitialized history and
/// [`EngineError::InvalidWindow`] when `window` is zero.
///
/// ```rust
/// use skywatch_core::{trend, History};
/// # use skywatch_core::testing::reading_with_humidity;
///
/// let mut history = History::new(3)?;
/// history.initialize(reading_with_humidity(1, 40.0))?;
/// history.append(reading_with_humidity(2, 45.0))?;
/// history.append(reading_with_humidity(3, 50.0))?;
///
/// let slope = trend::slope(&history, |r| r.humidity, 3)?;
/// assert_eq!(slope, 5.0);
/// # Ok::<(), skywatch_core::EngineError>(())
/// ```
pub fn slope<F>(history: &History, field: F, window: usize) -> EngineResult<f64>
where
    F: Fn(&Reading) -> f64,
{
    if !history.is_initialized() {
        return Err(EngineError::NotInitialized);
    }
    if window == 0 {
        return Err(EngineError::InvalidWindow);
    }

    let n = window.min(history.len());
    if n < 2 {
        return Ok(0.0);
    }

    // Newest reading is history index 0 but sits at x = n-1
    let field = &field;
    let points = || {
        history
            .iter()
            .take(n)
            .enumerate()
            .map(move |(index, reading)| ((n - 1 - index) as f64, field(reading)))
    };

    let count = n as f64;
    let (sum_x, sum_y) = points().fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let avg_x = sum_x / count;
    let avg_y = sum_y / count;

    let (numerator, denominator) = points().fold((0.0, 0.0), |(num, den), (x, y)| {
        let dx = x - avg_x;
        (num + dx * (y - avg_y), den + dx * dx)
    });

    Ok(utils::round_to(numerator / denominator, SLOPE_DECIMALS))
}

/// Humidity slope (%RH per sample)
pub fn humidity_slope(history: &History, window: usize) -> EngineResult<f64> {
    slope(history, |r| r.humidity, window)
}

/// Sea-level pressure slope (mb or inHg per sample)
pub fn pressure_slope(history: &History, window: usize) -> EngineResult<f64> {
    slope(history, |r| r.pressure.sea_level, window)
}
