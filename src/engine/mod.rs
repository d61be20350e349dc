//! Verification engine.
//!
//! Leaf primitives (path lookup, speed parsing, interface classification,
//! record comparison, command rendering, tabular text) plus the check
//! orchestration and result aggregation built on top of them.

pub mod classify;
pub mod compare;
pub mod orchestrator;
pub mod path;
pub mod result;
pub mod speed;
pub mod table;
pub mod template;

use template::TemplateError;

/// Failure while evaluating collected output.
///
/// Returned from a check body, these become failure messages on that
/// check's result. They never abort sibling checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("'{path}' not found in command output")]
    NotFound { path: String },

    #[error("'{path}' is not {expected}")]
    UnexpectedType { path: String, expected: &'static str },

    #[error("interface name '{name}' does not start with a letter and cannot be classified")]
    MalformedInterfaceName { name: String },

    #[error("malformed line '{line}': {reason}")]
    MalformedLine { line: String, reason: String },

    #[error("invalid {what} '{value}'")]
    InvalidValue { what: String, value: String },

    #[error("command '{command}' did not produce {expected} output")]
    WrongFormat { command: String, expected: &'static str },

    #[error("command '{command}' was rendered without parameter '{name}'")]
    MissingParameter { command: String, name: String },
}

/// Declared inputs rejected before any command is rendered.
///
/// Fatal to the one check, which is reported with status `error`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid inputs for {check}: {reason}")]
    Invalid { check: String, reason: String },

    #[error("cannot render commands for {check}: {source}")]
    Template {
        check: String,
        #[source]
        source: TemplateError,
    },
}
