//! Output formatting for netverify.
//!
//! Provides terminal, JSON, and JUnit XML output formatters. The JSON and
//! JUnit formatters are compiled in by the `json` and `junit` features; a
//! format whose feature is off falls back to terminal output.
//!
//! # Graceful Degradation
//!
//! This module handles errors gracefully:
//! - Non-TTY output: Color disabled via NO_COLOR or --no-color
//! - Empty reports: Produces valid output with zero checks
//! - Multi-line messages: Continuation lines are indented under their check
//!
//! All formatters produce valid output for any ValidationReport input.
//! No function in this module will panic.

use crate::cli::args::OutputFormat;
use crate::engine::result::{ResultSummary, ValidationReport};
use crate::{CheckCategory, CheckRecord, CheckStatus};
use chrono::{DateTime, SecondsFormat, Utc};
#[cfg(feature = "json")]
use serde::Serialize;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status_label(&self, status: CheckStatus) -> String {
        match status {
            CheckStatus::Success => self.colorize("[PASS]", "32"),
            CheckStatus::Failure => self.colorize("[FAIL]", "31"),
            CheckStatus::Error => self.colorize("[ERR ]", "33"),
            CheckStatus::Skipped => self.colorize("[SKIP]", "90"),
        }
    }

    fn hidden(&self, record: &CheckRecord) -> bool {
        self.quiet && matches!(record.result.status, CheckStatus::Success | CheckStatus::Skipped)
    }

    fn push_record(&self, output: &mut String, record: &CheckRecord) {
        output.push_str(&format!("    {} {}", self.status_label(record.result.status), record.name));
        if self.verbose {
            output.push_str(&format!(" ({}ms)", record.duration_ms));
        }
        output.push('\n');

        let show_messages = record.result.status != CheckStatus::Success || self.verbose;
        if show_messages {
            for message in &record.result.messages {
                for line in message.lines() {
                    output.push_str(&format!("           {}\n", line));
                }
            }
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        // Header
        output.push_str(RULE);
        output.push('\n');
        output.push_str("netverify validation report\n");
        output.push_str(&format!("Devices: {}\n", report.devices().join(", ")));
        output.push_str(&format!("Timestamp: {}\n", format_timestamp(&report.timestamp)));
        output.push_str(RULE);
        output.push_str("\n\n");

        for device in report.devices() {
            let device_checks: Vec<&CheckRecord> = report
                .checks
                .iter()
                .filter(|c| c.device == device && !self.hidden(c))
                .collect();

            if device_checks.is_empty() {
                continue;
            }

            output.push_str(&format!("{}\n", device));

            for category in CheckCategory::ALL {
                let category_checks: Vec<&&CheckRecord> =
                    device_checks.iter().filter(|c| c.category == category).collect();
                if category_checks.is_empty() {
                    continue;
                }

                output.push_str(&format!("  {} CHECKS\n", category.to_string().to_uppercase()));
                for check in category_checks {
                    self.push_record(&mut output, check);
                }
            }

            output.push('\n');
        }

        // Summary
        let summary = report.summary();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} passed, {} failed, {} errors, {} skipped\n",
            summary.success, summary.failure, summary.error, summary.skipped
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));

        let exit_desc = match summary.exit_code() {
            1 => "failures detected",
            2 => "checks could not be evaluated",
            _ => "all checks passed",
        };
        output.push_str(&format!("Exit code: {} ({})\n", summary.exit_code(), exit_desc));
        output.push_str(RULE);

        output
    }
}

#[cfg(feature = "json")]
/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[cfg(feature = "json")]
#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: &'a DateTime<Utc>,
    total_duration_ms: u64,
    summary: ResultSummary,
    checks: &'a [CheckRecord],
}

#[cfg(feature = "json")]
impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

#[cfg(feature = "json")]
impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let document = JsonReport {
            timestamp: &report.timestamp,
            total_duration_ms: report.total_duration_ms,
            summary: report.summary(),
            checks: &report.checks,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };

        rendered.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cannot serialize report");
            serde_json::json!({ "error": e.to_string() }).to_string()
        })
    }
}

#[cfg(feature = "junit")]
/// JUnit XML formatter
pub struct JunitFormatter;

#[cfg(feature = "junit")]
impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

#[cfg(feature = "junit")]
impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "junit")]
impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"{}\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total,
            summary.failure,
            summary.error,
            summary.skipped,
            report.total_duration_ms as f64 / 1000.0
        ));

        // One test suite per device
        for device in report.devices() {
            let device_checks: Vec<_> = report.checks.iter().filter(|c| c.device == device).collect();
            let count = |status: CheckStatus| device_checks.iter().filter(|c| c.result.status == status).count();
            let suite_time: u64 = device_checks.iter().map(|c| c.duration_ms).sum();

            output.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" skipped=\"{}\" time=\"{:.3}\">\n",
                Self::escape_xml(device),
                device_checks.len(),
                count(CheckStatus::Failure),
                count(CheckStatus::Error),
                count(CheckStatus::Skipped),
                suite_time as f64 / 1000.0
            ));

            for check in device_checks {
                output.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"netverify.{}\" time=\"{:.3}\"",
                    Self::escape_xml(&check.name),
                    check.category,
                    check.duration_ms as f64 / 1000.0
                ));

                let details = Self::escape_xml(&check.result.messages.join("\n"));
                let first = Self::escape_xml(check.result.messages.first().map(String::as_str).unwrap_or(""));

                match check.result.status {
                    CheckStatus::Success => output.push_str(" />\n"),
                    CheckStatus::Failure => {
                        output.push_str(">\n");
                        output.push_str(&format!("      <failure message=\"{}\">{}</failure>\n", first, details));
                        output.push_str("    </testcase>\n");
                    }
                    CheckStatus::Error => {
                        output.push_str(">\n");
                        output.push_str(&format!("      <error message=\"{}\">{}</error>\n", first, details));
                        output.push_str("    </testcase>\n");
                    }
                    CheckStatus::Skipped => {
                        output.push_str(">\n");
                        output.push_str(&format!("      <skipped message=\"{}\" />\n", first));
                        output.push_str("    </testcase>\n");
                    }
                }
            }

            output.push_str("  </testsuite>\n");
        }

        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    no_color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        #[cfg(feature = "json")]
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        #[cfg(feature = "junit")]
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
        OutputFormat::Text => Box::new(TerminalFormatter::new(!no_color, verbose, quiet)),
        #[allow(unreachable_patterns)]
        other => {
            tracing::warn!(format = ?other, "output format not compiled in, using text");
            Box::new(TerminalFormatter::new(!no_color, verbose, quiet))
        }
    }
}

/// Format a timestamp as ISO 8601 in UTC
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}
