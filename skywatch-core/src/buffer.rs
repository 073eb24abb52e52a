//! Bounded Rolling History of Station Readings
//!
//! ## Overview
//!
//! [`History`] keeps the most recent `capacity` readings, newest first.
//! Trend slopes and the usability classification are computed over this
//! window, so the buffer's ordering rules are part of the engine contract:
//!
//! - index 0 is always the most recent reading
//! - insertion is always at the front
//! - when full, exactly one reading is evicted, and it is always the oldest
//!
//! ```text
//! capacity = 4, after pushing r1..r5:
//!
//!   index:   0    1    2    3
//!          ┌────┬────┬────┬────┐
//!          │ r5 │ r4 │ r3 │ r2 │   r1 evicted
//!          └────┴────┴────┴────┘
//!           newest          oldest
//! ```
//!
//! ## Initialization
//!
//! A history is *initialized* once it accepts its first reading through
//! [`History::initialize`]. Appending, slope computation and classification
//! are only valid afterwards. Calling `initialize` a second time fails with
//! [`EngineError::AlreadyInitialized`]; use [`History::reset`] to start over.
//!
//! ## Storage
//!
//! Capacity is chosen at runtime (default 60), so storage is a `VecDeque`
//! allocated once at construction. Front insertion and tail eviction are both
//! O(1) and the deque never grows past `capacity`.
//!
//! ## Usage Example
//!
//! ```rust
//! use skywatch_core::History;
//! # use skywatch_core::testing::reading_with_humidity;
//!
//! let mut history = History::new(3)?;
//! history.initialize(reading_with_humidity(1, 40.0))?;
//! history.append(reading_with_humidity(2, 45.0))?;
//!
//! assert_eq!(history.len(), 2);
//! assert_eq!(history.at(0)?.humidity, 45.0);
//! # Ok::<(), skywatch_core::EngineError>(())
//! ```

use alloc::collections::VecDeque;
use serde::Serialize;

use crate::{
    constants::DEFAULT_HISTORY_CAPACITY,
    errors::{EngineError, EngineResult},
    reading::Reading,
};

/// Fixed-capacity, newest-first sequence of readings
///
/// ## Internal Invariants
///
/// - `readings.len() <= capacity`
/// - `initialized` is false only while `readings` is empty
/// - `readings[0]` is the most recently inserted reading
#[derive(Debug, Clone)]
pub struct History {
    readings: VecDeque<Reading>,
    capacity: usize,
    initialized: bool,
}

impl History {
    /// Create an empty history holding at most `capacity` readings
    pub fn new(capacity: usize) -> EngineResult<Self> {
        if capacity == 0 {
            return Err(EngineError::InvalidCapacity);
        }

        Ok(Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
            initialized: false,
        })
    }

    /// Accept the first reading
    ///
    /// Fails with [`EngineError::AlreadyInitialized`] if the history already
    /// holds readings; the existing contents are left untouched.
    pub fn initialize(&mut self, reading: Reading) -> EngineResult<()> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }

        self.readings.push_front(reading);
        self.initialized = true;
        log_debug!("history initialized (capacity {})", self.capacity);
        Ok(())
    }

    /// Insert a reading at the front, evicting the oldest one when full
    ///
    /// Returns the evicted reading, if any.
    pub fn append(&mut self, reading: Reading) -> EngineResult<Option<Reading>> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }

        self.readings.push_front(reading);

        if self.readings.len() > self.capacity {
            let evicted = self.readings.pop_back();
            if let Some(old) = &evicted {
                log_debug!("history full, evicted reading from t={}", old.timestamp);
            }
            return Ok(evicted);
        }

        Ok(None)
    }

    /// Reading at `index` (0 = newest)
    pub fn at(&self, index: usize) -> EngineResult<&Reading> {
        self.readings.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.readings.len(),
        })
    }

    /// Most recent reading
    pub fn newest(&self) -> EngineResult<&Reading> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        self.at(0)
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if no readings are stored
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Check if the next append will evict
    pub fn is_full(&self) -> bool {
        self.readings.len() == self.capacity
    }

    /// Maximum number of stored readings
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the first reading has been accepted
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Iterate from newest to oldest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Reading> + DoubleEndedIterator {
        self.readings.iter()
    }

    /// Read-only view of the full sequence, for export
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { readings: &self.readings }
    }

    /// Drop all readings and return to the uninitialized state
    pub fn reset(&mut self) {
        self.readings.clear();
        self.initialized = false;
    }

    /// Mutable access for in-place unit conversion
    pub(crate) fn readings_mut(&mut self) -> impl Iterator<Item = &mut Reading> {
        self.readings.iter_mut()
    }
}

impl Default for History {
    fn default() -> Self {
        Self {
            readings: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
            capacity: DEFAULT_HISTORY_CAPACITY,
            initialized: false,
        }
    }
}

/// Borrowed, newest-first view of a [`History`]
///
/// Serializes as a JSON array of readings.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Snapshot<'a> {
    readings: &'a VecDeque<Reading>,
}

impl<'a> Snapshot<'a> {
    /// Number of readings in the view
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if the view is empty
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate from newest to oldest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a Reading> {
        self.readings.iter()
    }
}
