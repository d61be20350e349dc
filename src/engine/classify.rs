//! Interface classification for attribute checks.
//!
//! An interface takes part in a check unless its leading alphabetic prefix
//! (`Ethernet`, `Loopback`, `Port`, ...) is on the ignore list. Interfaces
//! that take part may carry a per-interface expected value from an
//! [`OverrideTable`]; everything else falls back to the check's default.

use crate::engine::EvalError;
use serde::de::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Leading run of ASCII letters in an interface name.
///
/// `Port-Channel10` yields `Port`, `Ethernet1/1` yields `Ethernet`. A name
/// that does not start with a letter has no class and is rejected.
pub fn interface_prefix(name: &str) -> Result<&str, EvalError> {
    let end = name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(name.len());

    if end == 0 {
        return Err(EvalError::MalformedInterfaceName {
            name: name.to_string(),
        });
    }

    Ok(&name[..end])
}

/// Whether the interface takes part in a check with the given ignore list.
///
/// Prefixes are compared exactly (case-sensitive) against the configured
/// list.
pub fn participates<S: AsRef<str>>(name: &str, ignored_prefixes: &[S]) -> Result<bool, EvalError> {
    let prefix = interface_prefix(name)?;
    Ok(!ignored_prefixes.iter().any(|ignored| ignored.as_ref() == prefix))
}

/// What a check should expect of one interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<T> {
    /// Interface is excluded from the check
    Ignored,
    /// Interface is checked against this expected value
    Expect(T),
}

/// Ordered per-interface exceptions to a default expected value.
///
/// Built from a list of single-key records. The first entry naming an
/// interface wins; later entries for the same name are never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for OverrideTable<T> {
    fn default() -> Self {
        OverrideTable { entries: Vec::new() }
    }
}

impl<T> OverrideTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry after all existing ones.
    pub fn push(&mut self, interface: impl Into<String>, value: T) {
        self.entries.push((interface.into(), value));
    }

    /// First expected value recorded for `interface`.
    pub fn lookup(&self, interface: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| name == interface)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, interface: &str) -> bool {
        self.lookup(interface).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<T> FromIterator<(String, T)> for OverrideTable<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        OverrideTable {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OverrideTable<T> {
    /// Accepts `[{Ethernet5: 9000}, {Ethernet6: 9214}]`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records: Vec<BTreeMap<String, T>> = Vec::deserialize(deserializer)?;
        Ok(records.into_iter().flatten().collect())
    }
}

/// Classify an interface: ignore-list first, then overrides, then default.
///
/// An ignored prefix excludes the interface even when the override table
/// names it.
pub fn classify<T: Clone, S: AsRef<str>>(
    name: &str,
    ignored_prefixes: &[S],
    overrides: &OverrideTable<T>,
    default: &T,
) -> Result<Classification<T>, EvalError> {
    if !participates(name, ignored_prefixes)? {
        return Ok(Classification::Ignored);
    }

    let expected = overrides.lookup(name).unwrap_or(default).clone();
    Ok(Classification::Expect(expected))
}
