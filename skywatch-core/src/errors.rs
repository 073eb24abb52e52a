//! Error Types for the Analysis Engine
//!
//! ## Design Philosophy
//!
//! Engine errors follow the same rules as the rest of the crate:
//!
//! 1. **Small and Copy**: every variant carries only numbers, enums or
//!    `&'static str`, so errors can be returned by value from hot paths and
//!    stored by the caller without allocation.
//!
//! 2. **Typed, never silent**: an invalid index, a missing config or an
//!    uninitialized history is reported as an error. The engine never hands
//!    back a zero or stale value in place of a failure.
//!
//! 3. **Collaborator errors pass through**: fetch, config and export failures
//!    belong to the collaborators that produced them. [`StationError`] wraps
//!    them unchanged next to engine errors; nothing is retried here.
//!
//! ## Error Categories
//!
//! ### History state
//! - `NotInitialized`: an operation needs a history that has accepted its first reading
//! - `AlreadyInitialized`: `initialize` called twice without a `reset`
//! - `IndexOutOfRange`: buffer position outside `[0, len)`
//!
//! ### Configuration
//! - `ConfigMissing`: classification requested before a config was loaded
//! - `InvalidThreshold`, `InvalidWindow`, `InvalidCapacity`: rejected mutations
//! - `UnknownMetric`, `UnknownLevel`: unparseable names
//! - `InconsistentUnits`: the `units` record disagrees with its own `metric` flag
//!
//! ## Example
//!
//! ```rust
//! use skywatch_core::{EngineError, History};
//!
//! let history = History::default();
//! match history.at(0) {
//!     Err(EngineError::IndexOutOfRange { index, len }) => {
//!         assert_eq!((index, len), (0, 0));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

use crate::config::Metric;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Operation needs a history that has accepted its first reading
    #[error("History is not initialized")]
    NotInitialized,

    /// `initialize` was called on a history that already holds readings
    #[error("History is already initialized")]
    AlreadyInitialized,

    /// Buffer position outside the stored range
    #[error("Index {index} out of range for history of length {len}")]
    IndexOutOfRange {
        /// Requested position (0 = newest)
        index: usize,
        /// Number of readings currently stored
        len: usize,
    },

    /// Classifier invoked without a usable config
    #[error("Threshold config is not loaded")]
    ConfigMissing,

    /// History capacity must hold at least one reading
    #[error("History capacity must be at least 1")]
    InvalidCapacity,

    /// Trend window must cover at least one reading
    #[error("Trend window must be at least 1")]
    InvalidWindow,

    /// A threshold mutation or loaded value was rejected
    #[error("Invalid {metric} threshold: {reason}")]
    InvalidThreshold {
        /// Metric whose setting was rejected
        metric: Metric,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// Metric name did not match any monitored metric
    #[error("Unknown metric")]
    UnknownMetric,

    /// Level name or number did not match red, yellow or green
    #[error("Unknown level")]
    UnknownLevel,

    /// Unit labels disagree with the metric flag
    #[error("Unit labels do not match the active measurement system")]
    InconsistentUnits,
}

/// Failure of a [`Station`](crate::Station) operation that involves a collaborator
///
/// The collaborator's own error is carried unchanged in `Collaborator`.
#[derive(Error, Debug)]
pub enum StationError<E> {
    /// The engine rejected the operation
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Fetch, config or export collaborator failed
    #[error("Collaborator failed: {0}")]
    Collaborator(E),
}

impl<E> StationError<E> {
    /// Engine error, if this failure came from the engine
    pub fn engine(&self) -> Option<EngineError> {
        match self {
            Self::Engine(err) => Some(*err),
            Self::Collaborator(_) => None,
        }
    }
}
