//! Management plane security checks: SSH, Telnet, eAPI and its certificate.

use super::{name_list, single_output, NoInput};
use crate::engine::compare::{failed_logs, ComparisonRecord};
use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, DeviceCheck, ValidateInput};
use crate::engine::path;
use crate::engine::template::{Command, TemplateError};
use crate::engine::EvalError;
use crate::{CheckCategory, CheckResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

const SECONDS_PER_DAY: i64 = 86_400;

/// Get all security checks
pub fn descriptors() -> Vec<CheckDescriptor> {
    vec![
        CheckDescriptor::of::<VerifySshStatus>(),
        CheckDescriptor::of::<VerifySshIpv4Acl>(),
        CheckDescriptor::of::<VerifySshIpv6Acl>(),
        CheckDescriptor::of::<VerifyTelnetStatus>(),
        CheckDescriptor::of::<VerifyApiHttpStatus>(),
        CheckDescriptor::of::<VerifyApiHttpsSsl>(),
        CheckDescriptor::of::<VerifyApiIpv4Acl>(),
        CheckDescriptor::of::<VerifyApiIpv6Acl>(),
        CheckDescriptor::of::<VerifyApiSslCertificate>(),
    ]
}

fn default_vrf() -> String {
    "default".to_string()
}

/// Verifies the SSH daemon is disabled in the default VRF.
pub struct VerifySshStatus;

impl DeviceCheck for VerifySshStatus {
    type Input = NoInput;
    const NAME: &'static str = "VerifySSHStatus";
    const DESCRIPTION: &'static str = "Verifies if the SSHD agent is disabled in the default VRF.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::text("show management ssh")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let text = single_output(outputs)?.text()?;
        let Some(line) = text.lines().find(|l| l.starts_with("SSHD status")) else {
            result.mark_failure("Could not find SSH status in returned output.");
            return Ok(());
        };

        let status = line.split_once("is ").map(|(_, status)| status.trim());
        if status != Some("disabled") {
            result.mark_failure(line.trim());
        }
        Ok(())
    }
}

/// Expected access lists of a management service.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclInput {
    /// How many ACLs the service must have
    pub number: u64,
    #[serde(default = "default_vrf")]
    pub vrf: String,
}

impl ValidateInput for AclInput {}

/// Compare the ACL list at `list_path` against the declared count, then
/// require each ACL to be configured and active in the VRF.
fn verify_acls(
    doc: &Value,
    list_path: &str,
    label: &str,
    input: &AclInput,
    result: &mut CheckResult,
) -> Result<(), EvalError> {
    let acls = path::require_array(doc, list_path)?;

    if acls.len() as u64 != input.number {
        result.mark_failure(format!(
            "Expected {} {} ACL(s) in vrf {} but got {}",
            input.number,
            label,
            input.vrf,
            acls.len()
        ));
        return Ok(());
    }

    let in_vrf = |acl: &Value, field: &str| {
        path::get(acl, field)
            .and_then(Value::as_array)
            .is_some_and(|vrfs| vrfs.iter().any(|v| v.as_str() == Some(input.vrf.as_str())))
    };

    let inactive: Vec<&str> = acls
        .iter()
        .filter(|acl| !(in_vrf(acl, "configuredVrfs") && in_vrf(acl, "activeVrfs")))
        .map(|acl| path::get_str(acl, "name").unwrap_or("<unnamed>"))
        .collect();

    if !inactive.is_empty() {
        result.mark_failure(format!(
            "{} ACL(s) not configured or active in vrf {}: {}",
            label,
            input.vrf,
            name_list(&inactive)
        ));
    }
    Ok(())
}

/// Verifies the SSH daemon has the expected IPv4 ACLs in a VRF.
pub struct VerifySshIpv4Acl;

impl DeviceCheck for VerifySshIpv4Acl {
    type Input = AclInput;
    const NAME: &'static str = "VerifySSHIPv4Acl";
    const DESCRIPTION: &'static str = "Verifies if the SSHD agent has IPv4 ACL(s) configured.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &AclInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management ssh ip access-list summary")])
    }

    fn test(input: &AclInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        verify_acls(single_output(outputs)?.json()?, "ipAclList.aclList", "SSH IPv4", input, result)
    }
}

/// Verifies the SSH daemon has the expected IPv6 ACLs in a VRF.
pub struct VerifySshIpv6Acl;

impl DeviceCheck for VerifySshIpv6Acl {
    type Input = AclInput;
    const NAME: &'static str = "VerifySSHIPv6Acl";
    const DESCRIPTION: &'static str = "Verifies if the SSHD agent has IPv6 ACL(s) configured.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &AclInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management ssh ipv6 access-list summary")])
    }

    fn test(input: &AclInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        verify_acls(single_output(outputs)?.json()?, "ipv6AclList.aclList", "SSH IPv6", input, result)
    }
}

/// Verifies Telnet is disabled in the default VRF.
pub struct VerifyTelnetStatus;

impl DeviceCheck for VerifyTelnetStatus {
    type Input = NoInput;
    const NAME: &'static str = "VerifyTelnetStatus";
    const DESCRIPTION: &'static str = "Verifies if Telnet is disabled in the default VRF.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management telnet")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let state = path::require(single_output(outputs)?.json()?, "serverState")?;
        if state.as_str() != Some("disabled") {
            result.mark_failure("Telnet status for Default VRF is enabled");
        }
        Ok(())
    }
}

/// Verifies the eAPI plain HTTP server is not running.
pub struct VerifyApiHttpStatus;

impl DeviceCheck for VerifyApiHttpStatus {
    type Input = NoInput;
    const NAME: &'static str = "VerifyAPIHttpStatus";
    const DESCRIPTION: &'static str = "Verifies if eAPI HTTP server is disabled globally.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management api http-commands")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;
        let enabled = path::get(doc, "enabled").and_then(Value::as_bool) == Some(true);
        let http_running = path::get(doc, "httpServer.running").and_then(Value::as_bool) != Some(false);
        if !enabled || http_running {
            result.mark_failure("eAPI HTTP server is enabled globally");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpsSslInput {
    /// SSL profile the HTTPS server must use
    pub profile: String,
}

impl ValidateInput for HttpsSslInput {
    fn validate(&self) -> Result<(), String> {
        if self.profile.trim().is_empty() {
            return Err("profile must not be empty".to_string());
        }
        Ok(())
    }
}

/// Verifies the eAPI HTTPS server uses the expected, valid SSL profile.
pub struct VerifyApiHttpsSsl;

impl DeviceCheck for VerifyApiHttpsSsl {
    type Input = HttpsSslInput;
    const NAME: &'static str = "VerifyAPIHttpsSSL";
    const DESCRIPTION: &'static str = "Verifies if eAPI HTTPS server SSL profile is configured and valid.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &HttpsSslInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management api http-commands")])
    }

    fn test(input: &HttpsSslInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;
        match (path::get_str(doc, "sslProfile.name"), path::get_str(doc, "sslProfile.state")) {
            (Some(name), Some(state)) => {
                if name != input.profile || state != "valid" {
                    result.mark_failure(format!(
                        "eAPI HTTPS server SSL profile ({}) is misconfigured or invalid",
                        input.profile
                    ));
                }
            }
            _ => result.mark_failure(format!(
                "eAPI HTTPS server SSL profile ({}) is not configured",
                input.profile
            )),
        }
        Ok(())
    }
}

/// Verifies eAPI has the expected IPv4 ACLs in a VRF.
pub struct VerifyApiIpv4Acl;

impl DeviceCheck for VerifyApiIpv4Acl {
    type Input = AclInput;
    const NAME: &'static str = "VerifyAPIIPv4Acl";
    const DESCRIPTION: &'static str = "Verifies if eAPI has the right number IPv4 ACL(s) configured for a specified VRF.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &AclInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management api http-commands ip access-list summary")])
    }

    fn test(input: &AclInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        verify_acls(single_output(outputs)?.json()?, "ipAclList.aclList", "eAPI IPv4", input, result)
    }
}

/// Verifies eAPI has the expected IPv6 ACLs in a VRF.
pub struct VerifyApiIpv6Acl;

impl DeviceCheck for VerifyApiIpv6Acl {
    type Input = AclInput;
    const NAME: &'static str = "VerifyAPIIPv6Acl";
    const DESCRIPTION: &'static str = "Verifies if eAPI has the right number IPv6 ACL(s) configured for a specified VRF.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &AclInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show management api http-commands ipv6 access-list summary")])
    }

    fn test(input: &AclInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        verify_acls(single_output(outputs)?.json()?, "ipv6AclList.aclList", "eAPI IPv6", input, result)
    }
}

/// Public key algorithm of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptionAlgorithm {
    Rsa,
    Ecdsa,
}

impl EncryptionAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionAlgorithm::Rsa => "RSA",
            EncryptionAlgorithm::Ecdsa => "ECDSA",
        }
    }

    /// Key sizes, in bits, the algorithm is used with.
    pub fn key_sizes(&self) -> &'static [u32] {
        match self {
            EncryptionAlgorithm::Rsa => &[2048, 3072, 4096],
            EncryptionAlgorithm::Ecdsa => &[256, 384, 512],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SslCertificateInput {
    /// Certificate file name, such as `ARISTA_ROOT_CA.crt`
    pub certificate: String,
    /// Days before expiry at which the check starts failing
    pub expiry_limit: u32,
    pub subject_name: String,
    #[serde(default)]
    pub encryption: Option<EncryptionAlgorithm>,
    /// Key size in bits
    #[serde(default)]
    pub size: Option<u32>,
}

impl ValidateInput for SslCertificateInput {
    fn validate(&self) -> Result<(), String> {
        let Some(size) = self.size else {
            return Ok(());
        };
        let allowed: Vec<EncryptionAlgorithm> = match self.encryption {
            Some(algorithm) => vec![algorithm],
            None => vec![EncryptionAlgorithm::Rsa, EncryptionAlgorithm::Ecdsa],
        };
        if allowed.iter().any(|a| a.key_sizes().contains(&size)) {
            Ok(())
        } else {
            Err(format!(
                "size {} is not a key size of {}",
                size,
                allowed.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(" or ")
            ))
        }
    }
}

/// Seconds since the epoch, integral or fractional, as a UTC instant.
fn instant(value: Option<&Value>, what: &str) -> Result<DateTime<Utc>, EvalError> {
    let invalid = || EvalError::InvalidValue {
        what: what.to_string(),
        value: value.map(Value::to_string).unwrap_or_else(|| "null".to_string()),
    };
    let seconds = value.and_then(Value::as_f64).ok_or_else(invalid)?;
    let nanos = (seconds.fract() * 1e9) as u32;
    DateTime::from_timestamp(seconds.floor() as i64, nanos).ok_or_else(invalid)
}

/// Verifies the eAPI certificate is far enough from expiry and carries the
/// expected subject and key.
pub struct VerifyApiSslCertificate;

impl DeviceCheck for VerifyApiSslCertificate {
    type Input = SslCertificateInput;
    const NAME: &'static str = "VerifyAPISSLCertificate";
    const DESCRIPTION: &'static str = "Verifies the eAPI SSL certificate status.";
    const CATEGORY: CheckCategory = CheckCategory::Security;

    fn commands(_: &SslCertificateInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![
            Command::json("show management security ssl certificate"),
            Command::json("show clock"),
        ])
    }

    fn test(input: &SslCertificateInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let [certificates, clock] = outputs else {
            return Err(EvalError::NotFound {
                path: "show clock output".to_string(),
            });
        };

        // Certificate names contain dots, so walk explicit segments.
        let Some(certificate) =
            path::resolve_segments(certificates.json()?, &["certificates", input.certificate.as_str()])
        else {
            result.mark_failure(format!("SSL certificate '{}', is not configured.", input.certificate));
            return Ok(());
        };

        let expiry = instant(certificate.get("notAfter"), "certificate expiry")?;
        let now = instant(clock.json()?.get("utcTime"), "device clock")?;
        let days_left = (expiry - now).num_seconds().div_euclid(SECONDS_PER_DAY);

        if days_left < 0 {
            result.mark_failure(format!("SSL certificate `{}` is expired.", input.certificate));
            return Ok(());
        }
        if days_left < i64::from(input.expiry_limit) {
            result.mark_failure(format!(
                "SSL certificate `{}` is about to expire in {} days.",
                input.certificate, days_left
            ));
            return Ok(());
        }

        let mut expected = ComparisonRecord::new().with("common name", input.subject_name.as_str());
        let mut actual = ComparisonRecord::new().with_found("common name", path::get(certificate, "subject.commonName"));
        if let Some(algorithm) = input.encryption {
            expected.insert("encryption algorithm", algorithm.as_str());
            actual = actual.with_found("encryption algorithm", path::get(certificate, "publicKey.encryptionAlgorithm"));
        }
        if let Some(size) = input.size {
            expected.insert("key size", size);
            actual = actual.with_found("key size", path::get(certificate, "publicKey.size"));
        }

        let logs = failed_logs(&expected, &actual);
        if !logs.is_empty() {
            result.mark_failure(format!(
                "The SSL certificate `{}` is not configured properly:{}",
                input.certificate, logs
            ));
        }
        Ok(())
    }
}
