//! STUN checks.

use super::non_empty;
use crate::engine::compare::{failed_logs, ComparisonRecord};
use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, DeviceCheck, ValidateInput};
use crate::engine::path;
use crate::engine::template::{params, Command, CommandTemplate, TemplateError};
use crate::engine::EvalError;
use crate::{CheckCategory, CheckResult};
use serde::Deserialize;
use serde_json::Value;
use std::net::Ipv4Addr;

/// Get all STUN checks
pub fn descriptors() -> Vec<CheckDescriptor> {
    vec![CheckDescriptor::of::<VerifyStunClient>()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StunClient {
    pub source_address: Ipv4Addr,
    /// Checked only when given
    #[serde(default)]
    pub public_address: Option<Ipv4Addr>,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StunClientInput {
    pub stun_clients: Vec<StunClient>,
}

impl ValidateInput for StunClientInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.stun_clients, "stun_clients")
    }
}

/// Verifies STUN client translations for source and optional public address.
pub struct VerifyStunClient;

impl DeviceCheck for VerifyStunClient {
    type Input = StunClientInput;
    const NAME: &'static str = "VerifyStunClient";
    const DESCRIPTION: &'static str =
        "Verifies the STUN client is configured with the specified IPv4 source address, public address, and port.";
    const CATEGORY: CheckCategory = CheckCategory::Stun;

    fn commands(input: &StunClientInput) -> Result<Vec<Command>, TemplateError> {
        let template = CommandTemplate::new("show stun client translations {source_address} {port}");
        let bindings: Vec<_> = input
            .stun_clients
            .iter()
            .map(|client| {
                let mut binding = params([
                    ("source_address", client.source_address.to_string()),
                    ("port", client.port.to_string()),
                ]);
                if let Some(public) = client.public_address {
                    binding.insert("public_address".to_string(), public.to_string());
                }
                binding
            })
            .collect();
        template.render(&bindings)
    }

    fn test(input: &StunClientInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        for (client, output) in input.stun_clients.iter().zip(outputs) {
            // Only the first translation is compared.
            let first = path::get_object(output.json()?, "bindings").and_then(|bindings| bindings.values().next());
            let Some(binding) = first else {
                result.mark_failure(format!(
                    "STUN client transaction for source `{}:{}` is not found.",
                    client.source_address, client.port
                ));
                continue;
            };

            let read = |field: &str| path::get(binding, field).cloned().unwrap_or(Value::Null);

            let mut expected = ComparisonRecord::new()
                .with("source ip", client.source_address.to_string())
                .with("source port", client.port);
            let mut actual = ComparisonRecord::new()
                .with("source ip", read("sourceAddress.ip"))
                .with("source port", read("sourceAddress.port"));

            if let Some(public) = client.public_address {
                expected.insert("public ip", public.to_string());
                expected.insert("public port", client.port);
                actual.insert("public ip", read("publicAddress.ip"));
                actual.insert("public port", read("publicAddress.port"));
            }

            let logs = failed_logs(&expected, &actual);
            if !logs.is_empty() {
                result.mark_failure(format!("For STUN source address {}:{}", client.source_address, logs));
            }
        }
        Ok(())
    }
}
