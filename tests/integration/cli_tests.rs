//! CLI integration tests.
//!
//! Drives the `netverify` binary end to end with catalog and snapshot files
//! written to a temporary directory, and checks output and exit codes.

use crate::mocks::{MockDevice, FULL_CATALOG};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary directory holding a catalog and device snapshots.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Workspace {
            dir: TempDir::new().unwrap(),
        };
        workspace.write("catalog.yml", FULL_CATALOG);
        workspace
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn snapshot(&self, device: &MockDevice, name: &str) -> PathBuf {
        self.write(&format!("{}.json", name), &device.snapshot_json())
    }

    fn catalog(&self) -> PathBuf {
        self.dir.path().join("catalog.yml")
    }
}

fn netverify() -> Command {
    let mut cmd = Command::cargo_bin("netverify").unwrap();
    cmd.env_remove("NETVERIFY_FORMAT")
        .env_remove("NETVERIFY_CATALOG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_version_command() {
    netverify()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("netverify "))
        .stdout(predicate::str::contains("Target:"));
}

#[test]
fn test_help_exits_zero() {
    netverify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_unknown_flag_exits_three() {
    netverify().args(["check", "--bogus"]).assert().code(3);
    netverify().arg("frobnicate").assert().code(3);
}

#[test]
fn test_check_requires_snapshot() {
    let ws = Workspace::new();
    netverify()
        .args(["check", "-c"])
        .arg(ws.catalog())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SNAPSHOT"));
}

#[test]
fn test_list_command() {
    netverify()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available checks:"))
        .stdout(predicate::str::contains("VerifyStunClient"));
}

#[test]
fn test_list_json_by_category() {
    let output = netverify()
        .args(["list", "--category", "vlan", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["name"], "VerifyVlanInternalPolicy");
}

#[test]
fn test_list_security_and_bfd_categories() {
    let output = netverify()
        .args(["list", "--category", "security", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 9);
    assert!(parsed.as_array().unwrap().iter().all(|c| c["category"] == "security"));

    netverify()
        .args(["list", "--category", "bfd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VerifyBFDPeersIntervals"))
        .stdout(predicate::str::contains("VerifySSHStatus").not());
}

#[test]
fn test_check_healthy_device() {
    let ws = Workspace::new();
    let leaf1 = ws.snapshot(&MockDevice::healthy("leaf1"), "leaf1");

    netverify()
        .args(["check", "-c"])
        .arg(ws.catalog())
        .arg(&leaf1)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[PASS] VerifyDNSServers"))
        .stdout(predicate::str::contains("Exit code: 0"));
}

#[test]
fn test_check_degraded_device_exits_one() {
    let ws = Workspace::new();
    let leaf1 = ws.snapshot(&MockDevice::healthy("leaf1"), "leaf1");
    let leaf2 = ws.snapshot(&MockDevice::degraded("leaf2"), "leaf2");

    netverify()
        .args(["check", "--quiet", "-c"])
        .arg(ws.catalog())
        .args([&leaf1, &leaf2])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAIL] VerifyIllegalLACP"))
        .stdout(predicate::str::contains("[PASS]").not());
}

#[test]
fn test_check_missing_output_exits_two() {
    let ws = Workspace::new();
    let device = MockDevice::healthy("leaf1").without("show vlan internal allocation policy");
    let leaf1 = ws.snapshot(&device, "leaf1");

    netverify()
        .args(["check", "-c"])
        .arg(ws.catalog())
        .arg(&leaf1)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[ERR ] VerifyVlanInternalPolicy"));
}

#[cfg(feature = "json")]
#[test]
fn test_check_fail_fast_with_json() {
    let ws = Workspace::new();
    let leaf2 = ws.snapshot(&MockDevice::degraded("leaf2"), "leaf2");

    let output = netverify()
        .args(["check", "--fail-fast", "--format", "json", "-c"])
        .arg(ws.catalog())
        .arg(&leaf2)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["total"], 1);
}

#[cfg(feature = "junit")]
#[test]
fn test_check_only_filter_and_junit() {
    let ws = Workspace::new();
    let lab = ws.snapshot(&MockDevice::lab("lab1"), "lab1");

    netverify()
        .args(["check", "--only", "VerifyPortChannels", "--format", "junit", "-c"])
        .arg(ws.catalog())
        .arg(&lab)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("<testsuite name=\"lab1\" tests=\"1\""))
        .stdout(predicate::str::contains("<skipped"));
}

#[test]
fn test_check_catalog_from_env() {
    let ws = Workspace::new();
    let leaf1 = ws.snapshot(&MockDevice::healthy("leaf1"), "leaf1");

    netverify()
        .env("NETVERIFY_CATALOG", ws.catalog())
        .arg("check")
        .arg(&leaf1)
        .assert()
        .code(0);
}

#[test]
fn test_check_missing_catalog_exits_three() {
    let ws = Workspace::new();
    let leaf1 = ws.snapshot(&MockDevice::healthy("leaf1"), "leaf1");

    netverify()
        .args(["check", "-c"])
        .arg(ws.dir.path().join("absent.yml"))
        .arg(&leaf1)
        .assert()
        .code(3)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_check_bad_snapshot_exits_three() {
    let ws = Workspace::new();
    let broken = ws.write("broken.json", "{\"outputs\": {}}");

    netverify()
        .args(["check", "-c"])
        .arg(ws.catalog())
        .arg(&broken)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid snapshot"));
}

#[test]
fn test_check_unknown_check_exits_three() {
    let ws = Workspace::new();
    let catalog = ws.write("unknown.yml", "interfaces:\n  - VerifyTransceivers:\n");
    let leaf1 = ws.snapshot(&MockDevice::healthy("leaf1"), "leaf1");

    netverify()
        .args(["check", "-c"])
        .arg(&catalog)
        .arg(&leaf1)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown check 'VerifyTransceivers'"));
}

#[test]
fn test_commands_json() {
    let ws = Workspace::new();
    let output = netverify()
        .args(["commands", "--category", "stun", "--format", "json", "-c"])
        .arg(ws.catalog())
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed["commands"][0]["text"],
        "show stun client translations 100.64.3.2 4500"
    );
}

#[test]
fn test_commands_text_deduplicates() {
    let ws = Workspace::new();
    netverify()
        .args(["commands", "-c"])
        .arg(ws.catalog())
        .assert()
        .success()
        .stdout(predicate::str::contains("VerifyL3MTU (interfaces)\n  show interfaces [json]"))
        .stdout(predicate::str::contains("unique command(s) for 30 check(s)"));
}

#[test]
fn test_validate_command() {
    let ws = Workspace::new();
    netverify()
        .args(["validate", "-c"])
        .arg(ws.catalog())
        .assert()
        .success()
        .stdout(predicate::str::contains("30 entries, 0 invalid"));

    let bad = ws.write(
        "bad.yml",
        "services:\n  - VerifyDNSServers:\n      dns_servers:\n        - server_address: 10.14.0.1\n          priority: 9\n",
    );
    netverify()
        .args(["validate", "-c"])
        .arg(&bad)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[INVALID] VerifyDNSServers"));
}
