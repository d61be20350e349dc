//! Data module for netverify
//!
//! Static naming tables shared by checks and input validation.

pub mod interfaces;
