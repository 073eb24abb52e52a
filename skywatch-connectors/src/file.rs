//! JSON file persistence for the threshold config and history exports
//!
//! Both collaborators write pretty-printed JSON through a temporary sibling
//! file and a rename, so readers see either the old document or the new one.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use skywatch_core::{ConfigStore, Snapshot, SnapshotExporter, ThresholdConfig};

use crate::{ConfigError, ExportError};

/// Threshold config kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    /// Store backed by `path`; nothing is read until `load`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, writing the defaults first if the file does not exist
    pub fn load_or_init(&self) -> Result<ThresholdConfig, ConfigError> {
        if !self.path.exists() {
            info!("no config at {}, writing defaults", self.path.display());
            let config = ThresholdConfig::default();
            self.save(&config)?;
            return Ok(config);
        }
        self.load()
    }
}

impl ConfigStore for JsonFileConfigStore {
    type Error = ConfigError;

    fn load(&self) -> Result<ThresholdConfig, Self::Error> {
        let text = fs::read_to_string(&self.path)?;
        let config: ThresholdConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("loaded config from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &ThresholdConfig) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(config)?;
        write_replacing(&self.path, json.as_bytes())?;
        debug!("saved config to {}", self.path.display());
        Ok(())
    }
}

/// Writes each history snapshot as a JSON array, newest first
#[derive(Debug, Clone)]
pub struct JsonSnapshotExporter {
    path: PathBuf,
    exports: u64,
}

impl JsonSnapshotExporter {
    /// Exporter overwriting `path` on every export
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), exports: 0 }
    }

    /// File location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Successful exports so far
    pub fn export_count(&self) -> u64 {
        self.exports
    }
}

impl SnapshotExporter for JsonSnapshotExporter {
    type Error = ExportError;

    fn export(&mut self, snapshot: Snapshot<'_>) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_replacing(&self.path, json.as_bytes())?;
        self.exports += 1;
        debug!("exported {} readings to {}", snapshot.len(), self.path.display());
        Ok(())
    }
}

/// Write `contents` to a sibling temp file, then rename it over `path`
fn write_replacing(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    let staging = path.with_file_name(name);

    let result = File::create(&staging).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(err) = result {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    fs::rename(&staging, path)
}
