//! Expected/actual field comparison.
//!
//! Checks build two [`ComparisonRecord`]s field-for-field, one from the
//! declared inputs and one from device output, then call [`diff`] to get one
//! human-readable line per mismatching field.

use serde_json::Value;
use std::fmt;

/// Sentinel meaning "not applicable" for a field in both records.
pub const NOT_APPLICABLE: &str = "None";

/// Ordered mapping from field name to value.
///
/// A field present in the expected record but absent from the actual one
/// means the device output did not contain it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonRecord {
    fields: Vec<(String, Value)>,
}

impl ComparisonRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value but keeping its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field from a lookup that may have found nothing.
    pub fn with_found(mut self, field: impl Into<String>, value: Option<&Value>) -> Self {
        if let Some(value) = value {
            self.insert(field, value.clone());
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One mismatching field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    pub field: String,
    pub expected: Value,
    pub actual: Option<Value>,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            Some(actual) => write!(
                f,
                "Expected `{}` as the {}, but found `{}` instead.",
                display_value(&self.expected),
                self.field,
                display_value(actual)
            ),
            None => write!(
                f,
                "Expected `{}` as the {}, but it was not found in the actual output.",
                display_value(&self.expected),
                self.field
            ),
        }
    }
}

/// Fields of `expected` whose value differs in `actual`, in expected order.
pub fn mismatches(expected: &ComparisonRecord, actual: &ComparisonRecord) -> Vec<FieldMismatch> {
    expected
        .fields()
        .filter_map(|(field, expected_value)| match actual.get(field) {
            Some(actual_value) if actual_value == expected_value => None,
            actual_value => Some(FieldMismatch {
                field: field.to_string(),
                expected: expected_value.clone(),
                actual: actual_value.cloned(),
            }),
        })
        .collect()
}

/// One message per mismatching field; empty when the records agree.
pub fn diff(expected: &ComparisonRecord, actual: &ComparisonRecord) -> Vec<String> {
    mismatches(expected, actual)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// All mismatch lines, each on its own line and prefixed by a newline, ready
/// to append to a context sentence such as `For interface Ethernet1:`.
pub fn failed_logs(expected: &ComparisonRecord, actual: &ComparisonRecord) -> String {
    diff(expected, actual)
        .iter()
        .map(|line| format!("\n{}", line))
        .collect()
}

/// Render a value without JSON quoting for strings.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NOT_APPLICABLE.to_string(),
        other => other.to_string(),
    }
}
