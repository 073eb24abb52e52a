//! Multi-Metric Usability Classification
//!
//! ## Overview
//!
//! The classifier turns the newest reading, the trend slopes and the
//! configured thresholds into a [`Classification`]: one Red/Yellow/Green
//! [`Level`] per metric plus the value each level was derived from.
//!
//! ```text
//! History ──┬── newest reading ──► temperature spread, rain chance, wind speed
//!           └── trend windows ───► humidity slope, pressure slope
//!                                             │
//! ThresholdConfig ────────────────────────────┴──► Classification
//! ```
//!
//! Each metric is evaluated independently; see [`config`](crate::config) for
//! the comparison direction of each one. No overall verdict is derived here.
//! Callers that want one can fold [`Classification::levels`], for example by
//! taking the worst level.
//!
//! ## Caching
//!
//! [`Classifier`] keeps the last result. [`Classifier::classification`]
//! evaluates once and then returns the cached result until
//! [`Classifier::invalidate`] is called. New readings, threshold edits and
//! unit flips all invalidate it. Before the first evaluation every level
//! reads as Red.
//!
//! ## Example
//!
//! ```rust
//! use skywatch_core::{Classifier, History, Level, ThresholdConfig};
//! # use skywatch_core::testing::reading_with_rain;
//!
//! let mut history = History::new(10)?;
//! history.initialize(reading_with_rain(1, 10.0))?;
//!
//! let mut classifier = Classifier::new();
//! let result = classifier.evaluate(&history, &ThresholdConfig::default())?;
//!
//! assert_eq!(result.rain.level, Level::Green);
//! assert_eq!(result.humidity.slope, 0.0);
//! # Ok::<(), skywatch_core::EngineError>(())
//! ```

use core::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    buffer::History,
    config::{Metric, ThresholdConfig},
    errors::{EngineError, EngineResult},
    trend::{self, Trend},
};

/// Tri-state usability level
///
/// Ordered from worst to best, so `min` over several levels picks the worst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Level {
    /// Unusable
    #[default]
    Red = 0,
    /// Usable with caution
    Yellow = 1,
    /// Usable
    Green = 2,
}

impl Level {
    /// Capitalized name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Red),
            1 => Ok(Self::Yellow),
            2 => Ok(Self::Green),
            _ => Err(EngineError::UnknownLevel),
        }
    }
}

impl core::str::FromStr for Level {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Self::Red, Self::Yellow, Self::Green]
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or(EngineError::UnknownLevel)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dew point spread result
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadLevel {
    /// Usability level
    pub level: Level,
    /// `|current - dew_point|` of the newest reading
    pub difference: f64,
}

/// Result for a metric read straight off the newest reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueLevel {
    /// Usability level
    pub level: Level,
    /// Value compared against the thresholds
    pub value: f64,
}

/// Result for a history-window trend metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendLevel {
    /// Usability level
    pub level: Level,
    /// Least-squares slope per sample
    pub slope: f64,
    /// Direction label
    pub trend: Trend,
}

/// Per-metric usability verdicts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Humidity slope, labelled from the slope itself
    pub humidity: TrendLevel,
    /// Pressure slope, labelled with the station's own trend report
    pub pressure: TrendLevel,
    /// Dew point spread
    pub temperature: SpreadLevel,
    /// Chance of rain
    pub rain: ValueLevel,
    /// Average wind speed
    pub wind: ValueLevel,
}

impl Classification {
    /// Level of one metric
    pub fn level(&self, metric: Metric) -> Level {
        match metric {
            Metric::Temperature => self.temperature.level,
            Metric::Rain => self.rain.level,
            Metric::Humidity => self.humidity.level,
            Metric::Pressure => self.pressure.level,
            Metric::Wind => self.wind.level,
        }
    }

    /// Every metric with its level, in report order
    pub fn levels(&self) -> impl Iterator<Item = (Metric, Level)> + '_ {
        Metric::ALL.into_iter().map(move |metric| (metric, self.level(metric)))
    }
}

/// Evaluates and caches the usability classification
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    checked: bool,
    result: Classification,
}

impl Classifier {
    /// Classifier with nothing evaluated yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute every metric from `history` and `config`
    ///
    /// Fails with [`EngineError::NotInitialized`] before the history has its
    /// first reading. On failure the previous result stays cached.
    pub fn evaluate(&mut self, history: &History, config: &ThresholdConfig) -> EngineResult<Classification> {
        let newest = history.newest()?;

        let humidity_slope = trend::humidity_slope(history, config.humidity.n)?;
        let pressure_slope = trend::pressure_slope(history, config.pressure.n)?;
        let difference = newest.temperature.spread();

        let level = |metric: Metric, value: f64| config.threshold(metric).level(value, metric.comparison());

        self.result = Classification {
            humidity: TrendLevel {
                level: level(Metric::Humidity, humidity_slope),
                slope: humidity_slope,
                trend: Trend::from_slope(humidity_slope, config.humidity.yellow),
            },
            pressure: TrendLevel {
                level: level(Metric::Pressure, pressure_slope),
                slope: pressure_slope,
                trend: Trend::from_label(&newest.pressure.trend),
            },
            temperature: SpreadLevel {
                level: level(Metric::Temperature, difference),
                difference,
            },
            rain: ValueLevel {
                level: level(Metric::Rain, newest.chance_rain),
                value: newest.chance_rain,
            },
            wind: ValueLevel {
                level: level(Metric::Wind, newest.wind.speed),
                value: newest.wind.speed,
            },
        };
        self.checked = true;

        log_debug!(
            "classified: temperature={} rain={} humidity={} pressure={} wind={}",
            self.result.temperature.level,
            self.result.rain.level,
            self.result.humidity.level,
            self.result.pressure.level,
            self.result.wind.level
        );
        Ok(self.result)
    }

    /// Cached classification, evaluating first if nothing is cached
    pub fn classification(&mut self, history: &History, config: &ThresholdConfig) -> EngineResult<Classification> {
        if self.checked {
            return Ok(self.result);
        }
        self.evaluate(history, config)
    }

    /// Drop the cached result so the next request re-evaluates
    pub fn invalidate(&mut self) {
        self.checked = false;
    }

    /// Check if a result is cached
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Last computed result (all Red before the first evaluation)
    pub fn last(&self) -> &Classification {
        &self.result
    }
}
