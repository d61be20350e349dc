//! Device abstraction layer.
//!
//! The engine never talks to a device. It reads output that something else
//! already collected, through an [`OutputSource`]:
//! - Device identity (name, hardware model for platform skips)
//! - Output per rendered command, structured or plain text
//!
//! [`snapshot::Snapshot`] is the file-backed source used by the CLI.

pub mod snapshot;

use crate::engine::template::Command;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of a device under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    /// Hardware model, e.g. `DCS-7280SR3-48YC8` or `cEOSLab`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw_model: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Device {
            name: name.into(),
            hw_model: None,
        }
    }

    pub fn with_model(mut self, hw_model: impl Into<String>) -> Self {
        self.hw_model = Some(hw_model.into());
        self
    }
}

/// Raw output of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Text(String),
}

/// Source of already-collected command output for one device.
pub trait OutputSource {
    fn device(&self) -> &Device;

    /// Output for `command`, if it was collected.
    fn output(&self, command: &Command) -> Option<Output>;
}
