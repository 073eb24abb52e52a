//! Collaborators for the Skywatch analysis engine
//!
//! ## Overview
//!
//! The engine in `skywatch-core` does no I/O. This crate supplies the three
//! collaborators it delegates to, plus a loop that drives them:
//!
//! | Collaborator | Trait | Implementation |
//! |---|---|---|
//! | Weather provider | [`ReadingSource`] | [`http::TempestClient`] |
//! | Threshold persistence | [`ConfigStore`] | [`file::JsonFileConfigStore`] |
//! | History export | [`SnapshotExporter`] | [`file::JsonSnapshotExporter`] |
//! | Polling driver | | [`monitor::Monitor`] |
//!
//! ## Retry Policy
//!
//! Retries belong here, never in the engine. The Tempest client retries
//! transport failures, 5xx and 429 with exponential backoff:
//! ```text
//! retry_delay = min(base * 2^(attempt-1), max_delay)
//! ```
//! Any other 4xx fails on the first attempt. File collaborators do not retry.
//!
//! ## Example Usage
//!
//! ```no_run
//! use skywatch_connectors::{file::JsonFileConfigStore, http::{TempestClient, TempestConfig}};
//! use skywatch_core::Station;
//!
//! let client = TempestClient::new(TempestConfig::new("api-key", "150341"))?;
//! let mut station = Station::new(JsonFileConfigStore::new("thresholds.json"), 60)?;
//! station.load_config()?;
//! station.ingest(&client)?;
//! println!("{:?}", station.classification()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
pub mod file;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "std")]
pub mod monitor;

// Re-export common types
#[cfg(feature = "std")]
pub use file::{JsonFileConfigStore, JsonSnapshotExporter};
#[cfg(feature = "http")]
pub use http::{TempestClient, TempestConfig};
#[cfg(feature = "std")]
pub use monitor::{Monitor, MonitorConfig, MonitorStats, ShutdownHandle};

pub use skywatch_core::{ConfigStore, ReadingSource, SnapshotExporter};

#[cfg(feature = "std")]
pub use errors::{ConfigError, ExportError, FetchError};

#[cfg(feature = "std")]
mod errors {
    use skywatch_core::EngineError;
    use thiserror::Error;

    /// Weather provider failures
    #[derive(Debug, Error)]
    pub enum FetchError {
        /// Network or transport error
        #[error("Request failed: {0}")]
        Request(String),

        /// Provider returned an error status
        #[error("Server error {status}: {message}")]
        Status { status: u16, message: String },

        /// Body was not the expected forecast document
        #[error("Malformed response: {0}")]
        Malformed(String),

        /// Client settings are unusable
        #[error("Configuration error: {0}")]
        Config(String),
    }

    impl FetchError {
        /// Check if another attempt could succeed
        pub fn is_retryable(&self) -> bool {
            match self {
                Self::Request(_) => true,
                Self::Status { status, .. } => *status >= 500 || *status == 429,
                Self::Malformed(_) | Self::Config(_) => false,
            }
        }
    }

    /// Config file failures
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// File could not be read or written
        #[error("Config file I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// File is not a threshold config document
        #[error("Config file is not valid: {0}")]
        Parse(#[from] serde_json::Error),

        /// Document parsed but failed validation
        #[error("Config rejected: {0}")]
        Invalid(#[from] EngineError),
    }

    /// Snapshot export failures
    #[derive(Debug, Error)]
    pub enum ExportError {
        /// File could not be written
        #[error("Export I/O failed: {0}")]
        Io(#[from] std::io::Error),

        /// Snapshot could not be encoded
        #[error("Export encoding failed: {0}")]
        Serialization(#[from] serde_json::Error),
    }
}
