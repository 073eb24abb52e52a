//! Constants for Skywatch Core
//!
//! Centralized numeric values used by the analysis engine. Every value that
//! affects a classification or a unit conversion lives here with its unit
//! spelled out in the name.
//!
//! ## Organization
//!
//! - **Units**: conversion factors and rounding precision between the metric
//!   and imperial measurement systems
//! - **History**: rolling-window sizing
//! - **Thresholds**: default Red/Yellow boundaries for a fresh config
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the name (`_MB`, `_MPS`, `_PCT`)
//! 3. Group related constants together

/// Conversion factors and rounding precision between measurement systems.
pub mod units;

/// Rolling-history sizing.
pub mod history;

/// Default classification thresholds (metric system).
pub mod thresholds;

// Re-export commonly used constants for convenience
pub use units::{
    FAHRENHEIT_PER_CELSIUS, FAHRENHEIT_OFFSET, MPH_PER_MPS, MB_PER_INHG,
    PRESSURE_DECIMALS, SLOPE_DECIMALS,
};

pub use history::DEFAULT_HISTORY_CAPACITY;
