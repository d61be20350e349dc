//! Result aggregation and reporting.
//!
//! Collects per-device check records and summarizes them into a report.

use crate::{CheckCategory, CheckRecord, CheckStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub success: u32,
    pub failure: u32,
    pub skipped: u32,
    pub error: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

impl ResultSummary {
    /// Process exit code: 1 on any failure, 2 on errors without failures,
    /// otherwise 0.
    pub fn exit_code(&self) -> u8 {
        if self.failure > 0 {
            1
        } else if self.error > 0 {
            2
        } else {
            0
        }
    }

    fn add(&mut self, record: &CheckRecord) {
        self.total += 1;
        self.total_duration_ms += record.duration_ms;
        match record.result.status {
            CheckStatus::Success => self.success += 1,
            CheckStatus::Failure => self.failure += 1,
            CheckStatus::Skipped => self.skipped += 1,
            CheckStatus::Error => self.error += 1,
        }
    }
}

/// Validation report containing all check records
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub timestamp: DateTime<Utc>,
    pub checks: Vec<CheckRecord>,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        ValidationReport {
            timestamp: Utc::now(),
            checks: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();
        for record in &self.checks {
            summary.add(record);
        }
        summary
    }

    /// Distinct device names, in the order they were run
    pub fn devices(&self) -> Vec<&str> {
        let mut devices: Vec<&str> = Vec::new();
        for record in &self.checks {
            if !devices.contains(&record.device.as_str()) {
                devices.push(&record.device);
            }
        }
        devices
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result aggregator for collecting check records
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checks: Vec<CheckRecord>,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        ResultAggregator { checks: Vec::new() }
    }

    /// Add a completed check record
    pub fn add_result(&mut self, record: CheckRecord) {
        self.checks.push(record);
    }

    /// Check if there are any failures
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|c| c.result.status == CheckStatus::Failure)
    }

    /// Check if any check could not be evaluated
    pub fn has_errors(&self) -> bool {
        self.checks.iter().any(|c| c.result.status == CheckStatus::Error)
    }

    /// Get summary statistics
    pub fn get_summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();
        for record in &self.checks {
            summary.add(record);
        }
        summary
    }

    /// Get records by category
    pub fn get_by_category(&self, category: CheckCategory) -> Vec<&CheckRecord> {
        self.checks.iter().filter(|c| c.category == category).collect()
    }

    /// Get records grouped by device
    pub fn get_by_device(&self) -> BTreeMap<&str, Vec<&CheckRecord>> {
        let mut grouped: BTreeMap<&str, Vec<&CheckRecord>> = BTreeMap::new();
        for record in &self.checks {
            grouped.entry(record.device.as_str()).or_default().push(record);
        }
        grouped
    }

    /// Get only failed records
    pub fn get_failures(&self) -> Vec<&CheckRecord> {
        self.checks
            .iter()
            .filter(|c| c.result.status == CheckStatus::Failure)
            .collect()
    }

    /// Create final validation report
    pub fn into_report(self, total_duration_ms: u64) -> ValidationReport {
        ValidationReport {
            timestamp: Utc::now(),
            checks: self.checks,
            total_duration_ms,
        }
    }
}
