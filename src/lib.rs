//! netverify library
//!
//! Network device state verification. Checks declare the read-only commands
//! they need and the expectations they hold; the engine evaluates collected
//! command output against those expectations and reports, per device and per
//! check, success or the exact fields that differ.
//!
//! This library provides:
//! - Engine primitives: path lookups, speed specs, interface classification,
//!   expected/actual diffs, command templates
//! - A registry of interface, VLAN, DNS and STUN checks
//! - Catalog loading and device output snapshots
//! - Report formatting for terminal, JSON and JUnit
//!
//! # Example
//!
//! ```no_run
//! use netverify::catalog::Catalog;
//! use netverify::platform::snapshot::Snapshot;
//! use netverify::{run_checks, NetVerifyConfig};
//!
//! let catalog = Catalog::load("catalog.yml".as_ref()).expect("catalog");
//! let device = Snapshot::load("leaf1.json".as_ref()).expect("snapshot");
//! let report = run_checks(&NetVerifyConfig::default(), &catalog, &[&device]).expect("run");
//! println!("Checks failed: {}", report.summary().failure);
//! ```

pub mod catalog;
pub mod checks;
pub mod cli;
pub mod commands;
pub mod data;
pub mod engine;
pub mod platform;
pub mod version;

use cli::args::{CategoryFilter, SelectionArgs};
use engine::orchestrator::{CheckEngine, EngineConfig};
use engine::result::ValidationReport;
use platform::OutputSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-exports for public API
pub use engine::orchestrator::CheckEngine as Engine;
pub use engine::result::{ResultSummary, ValidationReport as Report};

/// Outcome of a single check evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Failure,
    Skipped,
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Success => write!(f, "success"),
            CheckStatus::Failure => write!(f, "failure"),
            CheckStatus::Skipped => write!(f, "skipped"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

/// Status plus the ordered messages explaining it.
///
/// Starts as success. Failures accumulate and are never cleared; an error
/// outranks a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub messages: Vec<String>,
}

impl CheckResult {
    pub fn new() -> Self {
        CheckResult {
            status: CheckStatus::Success,
            messages: Vec::new(),
        }
    }

    /// A result that was never evaluated.
    pub fn skipped(reason: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.mark_skipped(reason);
        result
    }

    /// Record a failing condition.
    pub fn mark_failure(&mut self, message: impl Into<String>) {
        if self.status != CheckStatus::Error {
            self.status = CheckStatus::Failure;
        }
        self.messages.push(message.into());
    }

    /// Record that the check could not be evaluated.
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = CheckStatus::Error;
        self.messages.push(message.into());
    }

    /// Skip the check; ignored once anything has failed.
    pub fn mark_skipped(&mut self, reason: impl Into<String>) {
        if self.status == CheckStatus::Success {
            self.status = CheckStatus::Skipped;
        }
        self.messages.push(reason.into());
    }

    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == CheckStatus::Failure
    }
}

impl Default for CheckResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status.to_string().to_uppercase())?;
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        Ok(())
    }
}

/// Check category for grouping related checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCategory {
    /// Interface counters, state, MTU, speed and addressing
    Interfaces,
    /// VLAN allocation
    Vlan,
    /// Device services such as DNS
    Services,
    /// STUN client translations
    Stun,
    /// BFD peer sessions and timers
    Bfd,
    /// Management plane access: SSH, Telnet, eAPI
    Security,
}

impl CheckCategory {
    pub const ALL: [CheckCategory; 6] = [
        CheckCategory::Interfaces,
        CheckCategory::Vlan,
        CheckCategory::Services,
        CheckCategory::Stun,
        CheckCategory::Bfd,
        CheckCategory::Security,
    ];
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Interfaces => write!(f, "interfaces"),
            CheckCategory::Vlan => write!(f, "vlan"),
            CheckCategory::Services => write!(f, "services"),
            CheckCategory::Stun => write!(f, "stun"),
            CheckCategory::Bfd => write!(f, "bfd"),
            CheckCategory::Security => write!(f, "security"),
        }
    }
}

impl FromStr for CheckCategory {
    type Err = NetVerifyError;

    fn from_str(s: &str) -> Result<Self> {
        CheckCategory::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| NetVerifyError::UnknownCategory { name: s.to_string() })
    }
}

/// One check evaluated against one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRecord {
    pub device: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    pub result: CheckResult,
    pub duration_ms: u64,
}

/// Error types for netverify operations.
#[derive(Debug, thiserror::Error)]
pub enum NetVerifyError {
    #[error("unknown check '{name}' in catalog")]
    UnknownCheck { name: String },

    #[error("unknown category '{name}'")]
    UnknownCategory { name: String },

    #[error("invalid catalog: {message}")]
    Catalog { message: String },

    #[error(transparent)]
    Snapshot(#[from] platform::snapshot::SnapshotError),

    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize {context}: {message}")]
    Serialize { context: String, message: String },
}

pub type Result<T, E = NetVerifyError> = std::result::Result<T, E>;

/// Configuration for running validation checks.
#[derive(Debug, Clone, Default)]
pub struct NetVerifyConfig {
    /// Categories to run (None = all)
    pub categories: Option<Vec<CheckCategory>>,
    /// Specific checks to skip (by name)
    pub skip_checks: Vec<String>,
    /// Specific checks to run (by name)
    pub only_checks: Vec<String>,
    /// Stop on first failure
    pub fail_fast: bool,
}

impl NetVerifyConfig {
    /// Create configuration from command line selection arguments
    pub fn from_args(args: &SelectionArgs) -> Self {
        let categories = match args.category {
            CategoryFilter::All => None,
            CategoryFilter::Interfaces => Some(vec![CheckCategory::Interfaces]),
            CategoryFilter::Vlan => Some(vec![CheckCategory::Vlan]),
            CategoryFilter::Services => Some(vec![CheckCategory::Services]),
            CategoryFilter::Stun => Some(vec![CheckCategory::Stun]),
            CategoryFilter::Bfd => Some(vec![CheckCategory::Bfd]),
            CategoryFilter::Security => Some(vec![CheckCategory::Security]),
        };

        NetVerifyConfig {
            categories,
            skip_checks: args.skip.clone(),
            only_checks: args.only.clone(),
            fail_fast: false,
        }
    }

    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            categories: self.categories.clone(),
            skip_checks: self.skip_checks.clone(),
            only_checks: self.only_checks.clone(),
            fail_fast: self.fail_fast,
        }
    }
}

/// Build an engine over every registered check.
pub fn engine(config: &NetVerifyConfig) -> CheckEngine {
    CheckEngine::new(config.engine_config())
}

/// Run validation checks.
///
/// Every catalog entry is evaluated against every device, in order. Returns
/// a `ValidationReport` with one record per device and check, or an error if
/// the catalog names a check that does not exist.
///
/// # Example
///
/// ```no_run
/// use netverify::catalog::Catalog;
/// use netverify::platform::snapshot::Snapshot;
/// use netverify::{run_checks, CheckCategory, NetVerifyConfig};
///
/// // Run only interface checks
/// let config = NetVerifyConfig {
///     categories: Some(vec![CheckCategory::Interfaces]),
///     ..Default::default()
/// };
/// let catalog = Catalog::load("catalog.yml".as_ref()).unwrap();
/// let device = Snapshot::load("leaf1.json".as_ref()).unwrap();
///
/// match run_checks(&config, &catalog, &[&device]) {
///     Ok(report) => {
///         let summary = report.summary();
///         println!("Success: {}, Failure: {}", summary.success, summary.failure);
///     }
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_checks(
    config: &NetVerifyConfig,
    catalog: &catalog::Catalog,
    devices: &[&dyn OutputSource],
) -> Result<ValidationReport> {
    engine(config).run(catalog, devices)
}
