//! VLAN checks.

use super::single_output;
use super::types::{Vlan, VlanPolicy};
use crate::engine::compare::{failed_logs, ComparisonRecord};
use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, DeviceCheck, ValidateInput};
use crate::engine::path;
use crate::engine::template::{Command, TemplateError};
use crate::engine::EvalError;
use crate::{CheckCategory, CheckResult};
use serde::Deserialize;
use serde_json::Value;

/// Get all VLAN checks
pub fn descriptors() -> Vec<CheckDescriptor> {
    vec![CheckDescriptor::of::<VerifyVlanInternalPolicy>()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VlanInternalPolicyInput {
    pub policy: VlanPolicy,
    /// First VLAN of the internal range
    pub start_vlan_id: Vlan,
    /// Last VLAN of the internal range
    pub end_vlan_id: Vlan,
}

impl ValidateInput for VlanInternalPolicyInput {
    fn validate(&self) -> Result<(), String> {
        if self.start_vlan_id > self.end_vlan_id {
            return Err(format!(
                "start_vlan_id {} is above end_vlan_id {}",
                self.start_vlan_id, self.end_vlan_id
            ));
        }
        Ok(())
    }
}

/// Verifies the internal VLAN allocation policy and its range.
pub struct VerifyVlanInternalPolicy;

impl DeviceCheck for VerifyVlanInternalPolicy {
    type Input = VlanInternalPolicyInput;
    const NAME: &'static str = "VerifyVlanInternalPolicy";
    const DESCRIPTION: &'static str =
        "Verifies the VLAN internal allocation policy is ascending or descending and uses the expected VLAN range.";
    const CATEGORY: CheckCategory = CheckCategory::Vlan;

    fn commands(_: &VlanInternalPolicyInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show vlan internal allocation policy")])
    }

    fn test(input: &VlanInternalPolicyInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;

        let expected = ComparisonRecord::new()
            .with("policy", input.policy.as_str())
            .with("startVlanId", input.start_vlan_id.get())
            .with("endVlanId", input.end_vlan_id.get());

        // Absent keys read as null so they render as "None".
        let mut actual = ComparisonRecord::new();
        for field in ["policy", "startVlanId", "endVlanId"] {
            actual.insert(field, path::get(doc, field).cloned().unwrap_or(Value::Null));
        }

        let logs = failed_logs(&expected, &actual);
        if !logs.is_empty() {
            result.mark_failure(format!(
                "Vlan internal allocation policy is not configured properly:{}",
                logs
            ));
        }
        Ok(())
    }
}
