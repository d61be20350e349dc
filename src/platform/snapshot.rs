//! File-backed device output.
//!
//! A snapshot is a JSON document holding a device descriptor and the output
//! of every command collected from it, keyed by command text:
//!
//! ```json
//! {
//!   "device": {"name": "leaf1", "hw_model": "DCS-7050SX3-48YC8"},
//!   "outputs": {
//!     "show interfaces counters errors": {"interfaceErrorCounters": {}},
//!     "show interfaces counters rates": "Port Name Intvl ..."
//!   }
//! }
//! ```
//!
//! String values are text output; anything else is structured output.
//!
//! # Graceful Degradation
//!
//! - File not found or unreadable: `SnapshotError::Io` with the path
//! - Invalid JSON or wrong shape: `SnapshotError::Parse` with the path
//! - Command not in the snapshot: `None`, reported by the engine as an error
//!   result for the one check that needed it

use super::{Device, Output, OutputSource};
use crate::engine::template::Command;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Snapshot loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    device: Device,
    #[serde(default)]
    outputs: Map<String, Value>,
}

/// Collected output for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    device: Device,
    outputs: Map<String, Value>,
}

impl Snapshot {
    /// An empty snapshot for `device`.
    pub fn new(device: Device) -> Self {
        Snapshot {
            device,
            outputs: Map::new(),
        }
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&text).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            device = %snapshot.device.name,
            commands = snapshot.outputs.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Parse a snapshot document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: SnapshotFile = serde_json::from_str(text)?;
        Ok(Snapshot {
            device: file.device,
            outputs: file.outputs,
        })
    }

    /// Add structured output for a command.
    pub fn with_json(mut self, command: impl Into<String>, output: Value) -> Self {
        self.outputs.insert(command.into(), output);
        self
    }

    /// Add text output for a command.
    pub fn with_text(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), Value::String(output.into()));
        self
    }

    /// Command texts with collected output.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }
}

impl OutputSource for Snapshot {
    fn device(&self) -> &Device {
        &self.device
    }

    fn output(&self, command: &Command) -> Option<Output> {
        let output = self.outputs.get(&command.text).map(|value| match value {
            Value::String(text) => Output::Text(text.clone()),
            other => Output::Json(other.clone()),
        });
        if output.is_none() {
            tracing::debug!(device = %self.device.name, command = %command, "command not in snapshot");
        }
        output
    }
}
