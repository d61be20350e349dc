//! Integration tests for netverify.
//!
//! These tests run catalogs against mock devices through the library and
//! through the command-line binary.

pub mod cli_tests;
pub mod full_run_tests;
pub mod output_tests;
