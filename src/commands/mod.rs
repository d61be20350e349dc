//! Command handlers for netverify
//!
//! This module contains implementations for the catalog commands:
//! - `list`: Registered checks, grouped by category
//! - `commands`: Commands a catalog needs from each device
//! - `validate`: Declared-input validation without evaluation
//!
//! `check` runs through [`crate::run_checks`] and the report formatters.

pub mod list;
pub mod render;
pub mod validate;
