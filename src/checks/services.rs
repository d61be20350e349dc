//! Services checks.

use super::types::DnsPriority;
use super::{non_empty, single_output};
use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, DeviceCheck, ValidateInput};
use crate::engine::path;
use crate::engine::template::{Command, TemplateError};
use crate::engine::EvalError;
use crate::{CheckCategory, CheckResult};
use serde::Deserialize;
use serde_json::Value;
use std::net::IpAddr;

/// Get all services checks
pub fn descriptors() -> Vec<CheckDescriptor> {
    vec![CheckDescriptor::of::<VerifyDnsServers>()]
}

fn default_vrf() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsServer {
    pub server_address: IpAddr,
    #[serde(default = "default_vrf")]
    pub vrf: String,
    /// Lower is tried first
    pub priority: DnsPriority,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsServersInput {
    pub dns_servers: Vec<DnsServer>,
}

impl ValidateInput for DnsServersInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.dns_servers, "dns_servers")
    }
}

/// Verifies DNS servers are configured with the expected VRF and priority.
pub struct VerifyDnsServers;

impl DeviceCheck for VerifyDnsServers {
    type Input = DnsServersInput;
    const NAME: &'static str = "VerifyDNSServers";
    const DESCRIPTION: &'static str = "Verifies if the DNS (Domain Name Service) servers are correctly configured.";
    const CATEGORY: CheckCategory = CheckCategory::Services;

    fn commands(_: &DnsServersInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show ip name-server")])
    }

    fn test(input: &DnsServersInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let configs = path::require_array(single_output(outputs)?.json()?, "nameServerConfigs")?;

        for server in &input.dns_servers {
            let address = server.server_address.to_string();
            let same_address: Vec<&Value> = configs
                .iter()
                .filter(|c| path::get_str(c, "ipAddr") == Some(address.as_str()))
                .collect();

            if same_address.is_empty() {
                result.mark_failure(format!("DNS server `{}` is not configured with any VRF.", address));
                continue;
            }

            let Some(config) = same_address
                .iter()
                .find(|c| path::get_str(c, "vrf") == Some(server.vrf.as_str()))
            else {
                result.mark_failure(format!(
                    "DNS server `{}` is not configured with VRF `{}`.",
                    address, server.vrf
                ));
                continue;
            };

            let found = config.get("priority").cloned().unwrap_or(Value::Null);
            if found.as_u64() != Some(u64::from(server.priority.get())) {
                result.mark_failure(format!(
                    "For DNS server `{}`, the expected priority is `{}`, but `{}` was found instead.",
                    address, server.priority, found
                ));
            }
        }
        Ok(())
    }
}
