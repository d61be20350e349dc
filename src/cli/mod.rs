//! CLI module for argument parsing and output formatting.
//!
//! Arguments are parsed with clap; reports are rendered by the formatter
//! matching the selected output format.

pub mod args;
pub mod output;
