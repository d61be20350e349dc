//! Output formatting integration tests.
//!
//! Runs the full catalog against mock devices and checks each formatter's
//! rendering of the resulting report.

use crate::mocks::{MockDevice, FULL_CATALOG, FULL_CATALOG_CHECKS};
use netverify::catalog::Catalog;
use netverify::cli::args::OutputFormat;
#[cfg(feature = "json")]
use netverify::cli::output::JsonFormatter;
#[cfg(feature = "junit")]
use netverify::cli::output::JunitFormatter;
use netverify::cli::output::{get_formatter, OutputFormatter, TerminalFormatter};
use netverify::engine::result::ValidationReport;
use netverify::platform::OutputSource;
use netverify::{run_checks, NetVerifyConfig};

fn report_for(devices: &[MockDevice]) -> ValidationReport {
    let catalog = Catalog::from_yaml(FULL_CATALOG).unwrap();
    let sources: Vec<&dyn OutputSource> = devices.iter().map(|d| d as &dyn OutputSource).collect();
    run_checks(&NetVerifyConfig::default(), &catalog, &sources).unwrap()
}

#[test]
fn test_terminal_healthy_report() {
    let report = report_for(&[MockDevice::healthy("leaf1")]);
    let output = TerminalFormatter::new(false, false, false).format(&report);

    assert!(output.contains("Devices: leaf1"));
    assert!(output.contains("  INTERFACES CHECKS\n"));
    assert!(output.contains("    [PASS] VerifyInterfacesSpeed\n"));
    assert!(output.contains(&format!("SUMMARY: {} passed, 0 failed, 0 errors, 0 skipped", FULL_CATALOG_CHECKS)));
    assert!(output.contains("Exit code: 0 (all checks passed)"));
    assert!(!output.contains("\x1b["));
}

#[test]
fn test_terminal_failure_messages_indented() {
    let report = report_for(&[MockDevice::degraded("leaf2")]);
    let output = TerminalFormatter::new(false, false, false).format(&report);

    assert!(output.contains("    [FAIL] VerifyL3MTU\n           Some interfaces do not have correct MTU configured:\n           [{\"Ethernet5\":1500}]\n"));
    assert!(output.contains("Exit code: 1 (failures detected)"));
}

#[test]
fn test_terminal_quiet_hides_passing_checks() {
    let report = report_for(&[MockDevice::healthy("leaf1"), MockDevice::degraded("leaf2")]);
    let output = TerminalFormatter::new(false, false, true).format(&report);

    // Nothing to show for the healthy device
    assert!(!output.contains("\nleaf1\n"));
    assert!(output.contains("\nleaf2\n"));
    assert!(!output.contains("[PASS]"));
    assert!(output.contains("[FAIL] VerifyStunClient"));
}

#[test]
fn test_terminal_shows_skip_reason() {
    let report = report_for(&[MockDevice::lab("lab1")]);
    let output = TerminalFormatter::new(false, false, false).format(&report);

    assert!(output.contains("    [SKIP] VerifyStormControlDrops\n           VerifyStormControlDrops test is not supported on cEOSLab.\n"));
    assert!(output.contains("2 skipped"));
}

#[test]
fn test_terminal_color() {
    let report = report_for(&[MockDevice::healthy("leaf1")]);
    let output = TerminalFormatter::new(true, false, false).format(&report);
    assert!(output.contains("\x1b[32m[PASS]\x1b[0m"));
}

#[cfg(feature = "json")]
#[test]
fn test_json_report() {
    let report = report_for(&[MockDevice::healthy("leaf1"), MockDevice::degraded("leaf2")]);
    let output = JsonFormatter::new(true).format(&report);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["summary"]["total"], 2 * FULL_CATALOG_CHECKS as u64);
    assert_eq!(parsed["summary"]["failure"], (FULL_CATALOG_CHECKS - 1) as u64);

    let checks = parsed["checks"].as_array().unwrap();
    let dns = checks
        .iter()
        .find(|c| c["device"] == "leaf2" && c["name"] == "VerifyDNSServers")
        .unwrap();
    assert_eq!(dns["category"], "services");
    assert_eq!(dns["result"]["status"], "failure");
    assert!(dns["result"]["messages"][0].as_str().unwrap().contains("10.14.0.1"));
}

#[cfg(feature = "junit")]
#[test]
fn test_junit_report() {
    let report = report_for(&[MockDevice::healthy("leaf1"), MockDevice::lab("lab1")]);
    let output = JunitFormatter::new().format(&report);

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains(&format!("<testsuite name=\"leaf1\" tests=\"{}\" failures=\"0\"", FULL_CATALOG_CHECKS)));
    assert!(output.contains("<testsuite name=\"lab1\""));
    assert!(output.contains("classname=\"netverify.vlan\""));
    assert!(output.contains("<skipped message=\"VerifyPortChannels test is not supported on cEOSLab.\" />"));
    assert!(output.ends_with("</testsuites>"));
}

#[cfg(feature = "junit")]
#[test]
fn test_junit_escapes_messages() {
    let report = report_for(&[MockDevice::degraded("leaf2")]);
    let output = JunitFormatter::new().format(&report);

    // Failure messages embed JSON, whose quotes must be escaped
    assert!(output.contains("[{&quot;Ethernet5&quot;:1500}]"));
    assert!(!output.contains("[{\"Ethernet5\""));
}

#[cfg(all(feature = "json", feature = "junit"))]
#[test]
fn test_get_formatter_dispatch() {
    let report = report_for(&[MockDevice::healthy("leaf1")]);

    let json = get_formatter(OutputFormat::Json, true, false, false).format(&report);
    assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

    let junit = get_formatter(OutputFormat::Junit, true, false, false).format(&report);
    assert!(junit.contains("<testsuites"));

    let text = get_formatter(OutputFormat::Text, true, false, false).format(&report);
    assert!(text.contains("SUMMARY:"));
}
