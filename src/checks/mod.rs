//! Check modules.
//!
//! This module contains all checks organized by category:
//! - Interfaces: counters, state, MTU, addressing and speed
//! - VLAN: internal allocation policy
//! - Services: DNS name servers
//! - STUN: client translations
//! - BFD: peer sessions and timers
//! - Security: SSH, Telnet and eAPI exposure, eAPI certificate
//!
//! # Graceful Degradation
//!
//! Check bodies follow these rules:
//! - Expected entity missing from output: failure naming it, then carry on
//!   with the remaining declared inputs
//! - Required top-level key missing: `EvalError`, reported as a failure
//! - Malformed interface name: failure naming the interface, others still
//!   evaluated
//!
//! Check bodies never panic and perform no I/O.

pub mod bfd;
pub mod interfaces;
pub mod security;
pub mod services;
pub mod stun;
pub mod types;
pub mod vlan;

use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, ValidateInput};
use crate::engine::EvalError;
use crate::CheckCategory;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{Map, Value};

static REGISTRY: Lazy<Vec<CheckDescriptor>> = Lazy::new(|| {
    let mut checks = Vec::new();
    checks.extend(interfaces::descriptors());
    checks.extend(vlan::descriptors());
    checks.extend(services::descriptors());
    checks.extend(stun::descriptors());
    checks.extend(bfd::descriptors());
    checks.extend(security::descriptors());
    checks
});

/// Get all registered checks
pub fn all() -> &'static [CheckDescriptor] {
    &REGISTRY
}

/// Look up a check by name
pub fn find(name: &str) -> Option<&'static CheckDescriptor> {
    REGISTRY.iter().find(|d| d.name == name)
}

/// Get checks for a specific category
pub fn by_category(category: CheckCategory) -> Vec<&'static CheckDescriptor> {
    REGISTRY.iter().filter(|d| d.category == category).collect()
}

/// Inputs of a check that takes none.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoInput {}

impl ValidateInput for NoInput {}

/// Output of a check's only command.
pub(crate) fn single_output(outputs: &[CommandOutput]) -> Result<&CommandOutput, EvalError> {
    outputs.first().ok_or_else(|| EvalError::NotFound {
        path: "command output".to_string(),
    })
}

/// `{key: value}`
pub(crate) fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Names as a JSON list, for failure messages.
pub(crate) fn name_list<S: AsRef<str>>(names: &[S]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|n| Value::String(n.as_ref().to_string()))
            .collect(),
    )
}

pub(crate) fn non_empty<T>(items: &[T], field: &str) -> Result<(), String> {
    if items.is_empty() {
        Err(format!("'{}' must list at least one entry", field))
    } else {
        Ok(())
    }
}
