//! Path lookups into structured command output.
//!
//! Device output is an untyped nested document. Every lookup goes through
//! [`resolve`], which branches on the value tag at each step and reports a
//! missing or non-mapping intermediate node as `None` instead of failing.

use crate::engine::EvalError;
use serde_json::{Map, Value};

/// Default segment separator for path expressions.
pub const DEFAULT_SEPARATOR: char = '.';

/// Resolve `path` against `document` using the default `.` separator.
pub fn get<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    resolve(document, path, DEFAULT_SEPARATOR)
}

/// Resolve a separator-joined path expression against a document.
///
/// Each segment must name a key of a JSON object. Arrays, scalars and
/// missing keys all end the walk with `None`. An empty path resolves to the
/// document itself.
///
/// Some interface names contain `.` (sub-interfaces such as
/// `Ethernet1.100`), so callers pick the separator.
pub fn resolve<'a>(document: &'a Value, path: &str, separator: char) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(document);
    }

    path.split(separator).try_fold(document, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// Resolve a path given as pre-split segments.
pub fn resolve_segments<'a, S: AsRef<str>>(document: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments.iter().try_fold(document, |node, segment| match node {
        Value::Object(map) => map.get(segment.as_ref()),
        _ => None,
    })
}

/// Resolve a path and return the string at that location, if it is one.
pub fn get_str<'a>(document: &'a Value, path: &str) -> Option<&'a str> {
    get(document, path).and_then(Value::as_str)
}

/// Resolve a path and return the unsigned integer at that location.
pub fn get_u64(document: &Value, path: &str) -> Option<u64> {
    get(document, path).and_then(Value::as_u64)
}

/// Resolve a path and return the object at that location.
pub fn get_object<'a>(document: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
    get(document, path).and_then(Value::as_object)
}

/// Like [`get`], but absence is an evaluation error naming the path.
pub fn require<'a>(document: &'a Value, path: &str) -> Result<&'a Value, EvalError> {
    get(document, path).ok_or_else(|| EvalError::NotFound {
        path: path.to_string(),
    })
}

/// Required object at `path`.
pub fn require_object<'a>(document: &'a Value, path: &str) -> Result<&'a Map<String, Value>, EvalError> {
    require(document, path)?
        .as_object()
        .ok_or_else(|| EvalError::UnexpectedType {
            path: path.to_string(),
            expected: "an object",
        })
}

/// Required array at `path`.
pub fn require_array<'a>(document: &'a Value, path: &str) -> Result<&'a Vec<Value>, EvalError> {
    require(document, path)?
        .as_array()
        .ok_or_else(|| EvalError::UnexpectedType {
            path: path.to_string(),
            expected: "an array",
        })
}
