//! Mock implementations for testing without network devices.
//!
//! This module provides configurable mock devices that answer the engine's
//! commands with canned output, simulating healthy, degraded and lab
//! (virtual platform) switches.

pub mod platform;

pub use platform::*;
