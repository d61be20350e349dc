//! Full run integration tests.
//!
//! Tests for complete catalog runs against mock devices, including
//! filtering, fail-fast behavior, platform skips and result aggregation.

use crate::mocks::{MockDevice, MockHealth, FULL_CATALOG, FULL_CATALOG_CHECKS};
use netverify::catalog::Catalog;
use netverify::engine::result::ValidationReport;
use netverify::platform::OutputSource;
use netverify::{run_checks, CheckCategory, CheckStatus, NetVerifyConfig, NetVerifyError};

fn full_catalog() -> Catalog {
    Catalog::from_yaml(FULL_CATALOG).unwrap()
}

fn run(config: &NetVerifyConfig, devices: &[&dyn OutputSource]) -> ValidationReport {
    run_checks(config, &full_catalog(), devices).unwrap()
}

fn status_of(report: &ValidationReport, device: &str, check: &str) -> CheckStatus {
    report
        .checks
        .iter()
        .find(|r| r.device == device && r.name == check)
        .map(|r| r.result.status)
        .unwrap_or_else(|| panic!("no record for {} on {}", check, device))
}

fn messages_of<'a>(report: &'a ValidationReport, check: &str) -> &'a [String] {
    &report
        .checks
        .iter()
        .find(|r| r.name == check)
        .unwrap()
        .result
        .messages
}

#[test]
fn test_full_catalog_covers_registry() {
    let catalog = full_catalog();
    assert_eq!(catalog.len(), FULL_CATALOG_CHECKS);
    assert_eq!(netverify::checks::all().len(), FULL_CATALOG_CHECKS);
}

#[test]
fn test_healthy_device_passes_everything() {
    let device = MockDevice::healthy("leaf1");
    let report = run(&NetVerifyConfig::default(), &[&device]);

    let failing: Vec<_> = report
        .checks
        .iter()
        .filter(|r| !r.result.is_success())
        .map(|r| format!("{}: {}", r.name, r.result))
        .collect();
    assert!(failing.is_empty(), "unexpected results: {:?}", failing);

    let summary = report.summary();
    assert_eq!(summary.success as usize, FULL_CATALOG_CHECKS);
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn test_degraded_device_fails() {
    let device = MockDevice::degraded("leaf2");
    let report = run(&NetVerifyConfig::default(), &[&device]);

    let summary = report.summary();
    assert_eq!(summary.failure as usize, FULL_CATALOG_CHECKS - 1);
    assert_eq!(summary.success, 1);
    assert_eq!(status_of(&report, "leaf2", "VerifyL2MTU"), CheckStatus::Success);
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn test_degraded_messages() {
    let device = MockDevice::degraded("leaf2");
    let report = run(&NetVerifyConfig::default(), &[&device]);

    assert_eq!(
        messages_of(&report, "VerifyInterfaceUtilization"),
        [r#"The following interfaces have a usage > 75%: {"Et1":"80.0%"}"#]
    );
    assert_eq!(
        messages_of(&report, "VerifyL3MTU"),
        [r#"Some interfaces do not have correct MTU configured:
[{"Ethernet5":1500}]"#]
    );
    assert_eq!(
        messages_of(&report, "VerifyLoopbackCount"),
        [r#"The following Loopbacks are not up: ["Loopback1"]"#]
    );
    assert_eq!(
        messages_of(&report, "VerifySVI"),
        [r#"The following SVIs are not up: ["Vlan20"]"#]
    );
    assert!(messages_of(&report, "VerifyInterfacesSpeed")[0].starts_with("For interface Ethernet1:"));
    assert!(messages_of(&report, "VerifyInterfacesSpeed")[0]
        .contains("Expected `4` as the lanes, but found `2` instead."));
    assert!(messages_of(&report, "VerifyVlanInternalPolicy")[0]
        .contains("Expected `ascending` as the policy, but found `descending` instead."));
}

#[test]
fn test_every_device_gets_every_check() {
    let devices = [
        MockDevice::with_health("leaf1", MockHealth::Healthy),
        MockDevice::with_health("leaf2", MockHealth::Degraded),
    ];
    let sources: Vec<&dyn OutputSource> = devices.iter().map(|d| d as &dyn OutputSource).collect();
    let report = run(&NetVerifyConfig::default(), &sources);

    assert_eq!(report.checks.len(), 2 * FULL_CATALOG_CHECKS);
    assert_eq!(report.devices(), vec!["leaf1", "leaf2"]);
    assert_eq!(status_of(&report, "leaf1", "VerifyDNSServers"), CheckStatus::Success);
    assert_eq!(status_of(&report, "leaf2", "VerifyDNSServers"), CheckStatus::Failure);
}

#[test]
fn test_category_filter() {
    let device = MockDevice::degraded("leaf2");
    let config = NetVerifyConfig {
        categories: Some(vec![CheckCategory::Vlan, CheckCategory::Stun]),
        ..Default::default()
    };
    let report = run(&config, &[&device]);

    let names: Vec<_> = report.checks.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["VerifyVlanInternalPolicy", "VerifyStunClient"]);
    assert!(!device.requested().iter().any(|c| c.starts_with("show interfaces")));
}

#[test]
fn test_security_and_bfd_categories() {
    let device = MockDevice::degraded("leaf2");
    let config = NetVerifyConfig {
        categories: Some(vec![CheckCategory::Bfd, CheckCategory::Security]),
        ..Default::default()
    };
    let report = run(&config, &[&device]);

    assert_eq!(report.checks.len(), 11);
    assert!(report.checks.iter().all(|r| r.result.status == CheckStatus::Failure));
    assert_eq!(
        messages_of(&report, "VerifyAPISSLCertificate"),
        ["SSL certificate `ARISTA_ROOT_CA.crt` is expired."]
    );
    assert_eq!(
        messages_of(&report, "VerifySSHIPv6Acl"),
        [r#"SSH IPv6 ACL(s) not configured or active in vrf MGMT: ["ACL_IPV6_SSH"]"#]
    );
    assert!(messages_of(&report, "VerifyBFDSpecificPeers")[0]
        .ends_with(r#"{"192.0.255.8":{"default":{"status":"down","remote_disc":3940685114}}}"#));
    assert!(device.requested().contains(&"show clock".to_string()));
}

#[test]
fn test_only_and_skip_filters() {
    let device = MockDevice::healthy("leaf1");
    let only = NetVerifyConfig {
        only_checks: vec!["VerifySVI".to_string(), "VerifyL2MTU".to_string()],
        ..Default::default()
    };
    assert_eq!(run(&only, &[&device]).checks.len(), 2);

    let skip = NetVerifyConfig {
        skip_checks: vec!["VerifySVI".to_string()],
        ..Default::default()
    };
    let report = run(&skip, &[&device]);
    assert_eq!(report.checks.len(), FULL_CATALOG_CHECKS - 1);
    assert!(report.checks.iter().all(|r| r.name != "VerifySVI"));
}

#[test]
fn test_fail_fast_stops_at_first_failure() {
    let devices = [MockDevice::degraded("leaf2"), MockDevice::healthy("leaf1")];
    let sources: Vec<&dyn OutputSource> = devices.iter().map(|d| d as &dyn OutputSource).collect();
    let config = NetVerifyConfig {
        fail_fast: true,
        ..Default::default()
    };
    let report = run(&config, &sources);

    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].name, "VerifyInterfaceUtilization");
    assert_eq!(report.checks[0].result.status, CheckStatus::Failure);
    assert!(devices[1].requested().is_empty());
}

#[test]
fn test_virtual_platform_skips_hardware_checks() {
    let device = MockDevice::lab("lab1");
    let report = run(&NetVerifyConfig::default(), &[&device]);

    assert_eq!(status_of(&report, "lab1", "VerifyStormControlDrops"), CheckStatus::Skipped);
    assert_eq!(status_of(&report, "lab1", "VerifyPortChannels"), CheckStatus::Skipped);
    assert_eq!(
        messages_of(&report, "VerifyPortChannels"),
        ["VerifyPortChannels test is not supported on cEOSLab."]
    );
    assert_eq!(report.summary().skipped, 2);
    assert_eq!(report.summary().exit_code(), 0);

    // Skipped checks never ask for output
    let requested = device.requested();
    assert!(!requested.iter().any(|c| c == "show storm-control" || c == "show port-channel"));
}

#[test]
fn test_missing_output_is_an_error_for_that_check_only() {
    let device = MockDevice::healthy("leaf1").without("show ip name-server");
    let report = run(&NetVerifyConfig::default(), &[&device]);

    assert_eq!(status_of(&report, "leaf1", "VerifyDNSServers"), CheckStatus::Error);
    assert_eq!(
        messages_of(&report, "VerifyDNSServers"),
        ["No output collected for command 'show ip name-server'"]
    );
    let summary = report.summary();
    assert_eq!(summary.error, 1);
    assert_eq!(summary.success as usize, FULL_CATALOG_CHECKS - 1);
    assert_eq!(summary.exit_code(), 2);
}

#[test]
fn test_templated_commands_requested_per_interface() {
    let device = MockDevice::healthy("leaf1");
    let config = NetVerifyConfig {
        only_checks: vec!["VerifyIPProxyARP".to_string()],
        ..Default::default()
    };
    run(&config, &[&device]);
    assert_eq!(
        device.requested(),
        vec!["show ip interface Ethernet1", "show ip interface Ethernet5"]
    );
}

#[test]
fn test_malformed_output_fails_check() {
    let device = MockDevice::healthy("leaf1").with_json("show ip virtual router", serde_json::json!({"macs": []}));
    let report = run(&NetVerifyConfig::default(), &[&device]);

    assert_eq!(status_of(&report, "leaf1", "VerifyIpVirtualRouterMac"), CheckStatus::Failure);
    assert!(messages_of(&report, "VerifyIpVirtualRouterMac")[0].contains("virtualMacs"));
}

#[test]
fn test_invalid_inputs_reported_per_device() {
    let catalog = Catalog::from_yaml("interfaces:\n  - VerifyLoopbackCount:\n      number: many\n").unwrap();
    let device = MockDevice::healthy("leaf1");
    let report = run_checks(&NetVerifyConfig::default(), &catalog, &[&device]).unwrap();

    assert_eq!(report.checks[0].result.status, CheckStatus::Error);
    assert!(report.checks[0].result.messages[0].contains("VerifyLoopbackCount"));
    assert!(device.requested().is_empty());
}

#[test]
fn test_unknown_check_rejects_catalog() {
    let catalog = Catalog::from_yaml("interfaces:\n  - VerifySVI:\n  - VerifyTransceivers:\n").unwrap();
    let device = MockDevice::healthy("leaf1");
    let err = run_checks(&NetVerifyConfig::default(), &catalog, &[&device]).unwrap_err();
    assert!(matches!(err, NetVerifyError::UnknownCheck { ref name } if name == "VerifyTransceivers"));
    assert!(device.requested().is_empty());
}

#[test]
fn test_empty_device_errors_everywhere() {
    let device = MockDevice::empty("blank");
    let report = run(&NetVerifyConfig::default(), &[&device]);
    assert_eq!(report.summary().error as usize, FULL_CATALOG_CHECKS);
}
