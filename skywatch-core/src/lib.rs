//! Analysis engine for Skywatch
//!
//! Keeps a rolling history of weather readings, derives humidity and
//! pressure trends from it, and classifies current conditions per metric as
//! Red, Yellow or Green against a user-editable threshold config.
//!
//! Key constraints:
//! - No I/O: readings, config persistence and export go through the
//!   [collaborator traits](traits)
//! - Builds without `std` (needs `alloc`)
//! - Config and history always share one unit system
//!
//! ```no_run
//! use skywatch_core::{memory::MemoryConfigStore, Level, Station, ThresholdConfig};
//! # use skywatch_core::testing::reading;
//!
//! let mut station = Station::new(MemoryConfigStore::with_config(ThresholdConfig::default()), 60)?;
//! station.load_config()?;
//! station.accept(reading(1_700_000_000))?;
//!
//! let classification = station.classification()?;
//! if classification.rain.level == Level::Red {
//!     // Not a good time to fly
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod buffer;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod reading;
pub mod station;
#[doc(hidden)]
pub mod testing;
pub mod traits;
pub mod trend;
pub mod units;
mod utils;

// Public API
pub use buffer::{History, Snapshot};
pub use classifier::{Classification, Classifier, Level, SpreadLevel, TrendLevel, ValueLevel};
pub use config::{Comparison, Metric, Threshold, ThresholdConfig, UnitSystem, Units, WindowedThreshold};
pub use errors::{EngineError, EngineResult, StationError};
pub use reading::{EpochSeconds, PressureReading, Reading, TemperatureReading, WindReading};
pub use station::Station;
pub use traits::{ConfigStore, ReadingSource, SnapshotExporter};
pub use trend::Trend;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
