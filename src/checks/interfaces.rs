//! Interface checks.
//!
//! Counters, error-disabled and link state, port-channel health, loopback
//! and SVI state, MTU per forwarding model, proxy-ARP, IPv4 addressing,
//! virtual router MAC and negotiated speed.

use super::types::{Interface, InterfaceState, Ipv4Prefix, MacAddress, ProtocolStatus, SpeedInput};
use super::{keyed, name_list, non_empty, single_output, NoInput};
use crate::data::interfaces::{
    DEFAULT_IGNORED_INTERFACES, DEFAULT_L2_MTU, DEFAULT_L3_MTU, UTILIZATION_THRESHOLD, VIRTUAL_PLATFORMS,
};
use crate::engine::classify::{classify, Classification, OverrideTable};
use crate::engine::compare::{failed_logs, ComparisonRecord, NOT_APPLICABLE};
use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, DeviceCheck, ValidateInput};
use crate::engine::path;
use crate::engine::speed::{self, SpeedSpec};
use crate::engine::table::{self, Threshold};
use crate::engine::template::{params, Command, CommandTemplate, TemplateError};
use crate::engine::EvalError;
use crate::{CheckCategory, CheckResult};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Inbound utilization percentage, counted from the end of a rates row.
const IN_PERCENT_FIELD: usize = 5;
/// Outbound utilization percentage, counted from the end of a rates row.
const OUT_PERCENT_FIELD: usize = 2;

/// Get all interface checks
pub fn descriptors() -> Vec<CheckDescriptor> {
    vec![
        CheckDescriptor::of::<VerifyInterfaceUtilization>(),
        CheckDescriptor::of::<VerifyInterfaceErrors>(),
        CheckDescriptor::of::<VerifyInterfaceDiscards>(),
        CheckDescriptor::of::<VerifyInterfaceErrDisabled>(),
        CheckDescriptor::of::<VerifyInterfacesStatus>(),
        CheckDescriptor::of::<VerifyStormControlDrops>(),
        CheckDescriptor::of::<VerifyPortChannels>(),
        CheckDescriptor::of::<VerifyIllegalLacp>(),
        CheckDescriptor::of::<VerifyLoopbackCount>(),
        CheckDescriptor::of::<VerifySvi>(),
        CheckDescriptor::of::<VerifyL3Mtu>(),
        CheckDescriptor::of::<VerifyIpProxyArp>(),
        CheckDescriptor::of::<VerifyL2Mtu>(),
        CheckDescriptor::of::<VerifyInterfaceIpv4>(),
        CheckDescriptor::of::<VerifyIpVirtualRouterMac>(),
        CheckDescriptor::of::<VerifyInterfacesSpeed>(),
    ]
}

fn has_nonzero_counter(counters: &Value) -> bool {
    counters
        .as_object()
        .map_or(false, |map| map.values().any(|v| v.as_f64().map_or(false, |n| n > 0.0)))
}

/// Line protocol and status both up (`up` or `connected`).
fn is_up(details: &Value) -> bool {
    path::get_str(details, "lineProtocolStatus") == Some("up")
        && path::get_str(details, "interfaceStatus") == Some("connected")
}

/// Verifies interface utilization is below 75%.
pub struct VerifyInterfaceUtilization;

impl DeviceCheck for VerifyInterfaceUtilization {
    type Input = NoInput;
    const NAME: &'static str = "VerifyInterfaceUtilization";
    const DESCRIPTION: &'static str = "Verifies interfaces utilization is below 75%.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::text("show interfaces counters rates")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let text = single_output(outputs)?.text()?;
        let scan = table::breaches(
            text,
            &[IN_PERCENT_FIELD, OUT_PERCENT_FIELD],
            Threshold(UTILIZATION_THRESHOLD),
        );

        for malformed in scan.malformed {
            result.mark_failure(malformed.to_string());
        }

        if !scan.breaches.is_empty() {
            let listing: Map<String, Value> = scan
                .breaches
                .into_iter()
                .map(|b| (b.key, Value::String(b.value)))
                .collect();
            result.mark_failure(format!(
                "The following interfaces have a usage > 75%: {}",
                Value::Object(listing)
            ));
        }
        Ok(())
    }
}

/// Verifies interface error counters are all zero.
pub struct VerifyInterfaceErrors;

impl DeviceCheck for VerifyInterfaceErrors {
    type Input = NoInput;
    const NAME: &'static str = "VerifyInterfaceErrors";
    const DESCRIPTION: &'static str = "Verifies that interfaces error counters are equal to zero.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces counters errors")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let counters = path::require_object(single_output(outputs)?.json()?, "interfaceErrorCounters")?;
        let wrong: Vec<Value> = counters
            .iter()
            .filter(|(_, c)| has_nonzero_counter(c))
            .map(|(name, c)| keyed(name, c.clone()))
            .collect();

        if !wrong.is_empty() {
            result.mark_failure(format!(
                "The following interface(s) have non-zero error counters: {}",
                Value::Array(wrong)
            ));
        }
        Ok(())
    }
}

/// Verifies interface discard counters are all zero.
pub struct VerifyInterfaceDiscards;

impl DeviceCheck for VerifyInterfaceDiscards {
    type Input = NoInput;
    const NAME: &'static str = "VerifyInterfaceDiscards";
    const DESCRIPTION: &'static str = "Verifies interfaces packet discard counters are equal to zero.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces counters discards")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let interfaces = path::require_object(single_output(outputs)?.json()?, "interfaces")?;
        let wrong: Vec<Value> = interfaces
            .iter()
            .filter(|(_, c)| has_nonzero_counter(c))
            .map(|(name, c)| keyed(name, c.clone()))
            .collect();

        if !wrong.is_empty() {
            result.mark_failure(format!(
                "The following interfaces have non 0 discard counter(s): {}",
                Value::Array(wrong)
            ));
        }
        Ok(())
    }
}

/// Verifies no interface is error-disabled.
pub struct VerifyInterfaceErrDisabled;

impl DeviceCheck for VerifyInterfaceErrDisabled {
    type Input = NoInput;
    const NAME: &'static str = "VerifyInterfaceErrDisabled";
    const DESCRIPTION: &'static str = "Verifies there is no interface in error disable state.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces status")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let statuses = path::require_object(single_output(outputs)?.json()?, "interfaceStatuses")?;
        let disabled: Vec<&str> = statuses
            .iter()
            .filter(|(_, status)| path::get_str(status, "linkStatus") == Some("errdisabled"))
            .map(|(name, _)| name.as_str())
            .collect();

        if !disabled.is_empty() {
            result.mark_failure(format!(
                "The following interfaces are in error disabled state: {}",
                name_list(&disabled)
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceStatusInput {
    pub interface: Interface,
    pub state: InterfaceState,
    #[serde(default)]
    pub protocol_status: ProtocolStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfacesStatusInput {
    pub interfaces: Vec<InterfaceStatusInput>,
}

impl ValidateInput for InterfacesStatusInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.interfaces, "interfaces")
    }
}

/// Verifies the listed interfaces are in their expected state.
pub struct VerifyInterfacesStatus;

impl VerifyInterfacesStatus {
    fn in_state(expected: &InterfaceStatusInput, protocol: &str, status: &str) -> bool {
        let up = |s: &str| s.starts_with("connected") || s.starts_with("up");
        match (expected.state, expected.protocol_status) {
            (InterfaceState::Up, _) => up(protocol) && up(status),
            (InterfaceState::AdminDown, ProtocolStatus::Up) => {
                protocol.starts_with("up") && status.starts_with("adminDown")
            }
            (InterfaceState::AdminDown, ProtocolStatus::Down) => {
                protocol.starts_with("down") && status.starts_with("adminDown")
            }
        }
    }
}

impl DeviceCheck for VerifyInterfacesStatus {
    type Input = InterfacesStatusInput;
    const NAME: &'static str = "VerifyInterfacesStatus";
    const DESCRIPTION: &'static str = "Verifies if the provided list of interfaces are all in the expected state.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &InterfacesStatusInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces description")])
    }

    fn test(input: &InterfacesStatusInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;
        let mut not_configured = Vec::new();
        let mut wrong_state = Vec::new();

        for expected in &input.interfaces {
            let name = expected.interface.as_str();
            // Sub-interface names contain '.'
            let Some(details) = path::resolve(doc, &format!("interfaceDescriptions;{}", name), ';') else {
                not_configured.push(name);
                continue;
            };

            let protocol = path::get_str(details, "lineProtocolStatus").unwrap_or_default();
            let status = path::get_str(details, "interfaceStatus").unwrap_or_default();

            if !Self::in_state(expected, protocol, status) {
                wrong_state.push(format!(
                    "{} is {}/{} expected {}/{}",
                    name, protocol, status, expected.protocol_status, expected.state
                ));
            }
        }

        if !not_configured.is_empty() {
            result.mark_failure(format!(
                "The following interface(s) are not configured: {}",
                name_list(&not_configured)
            ));
        }
        if !wrong_state.is_empty() {
            result.mark_failure(format!(
                "The following interface(s) are not in the expected state: {}",
                name_list(&wrong_state)
            ));
        }
        Ok(())
    }
}

/// Verifies storm control did not drop any packets.
pub struct VerifyStormControlDrops;

impl DeviceCheck for VerifyStormControlDrops {
    type Input = NoInput;
    const NAME: &'static str = "VerifyStormControlDrops";
    const DESCRIPTION: &'static str =
        "Verifies the device did not drop packets due its to storm-control configuration.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;
    const SKIP_ON_PLATFORMS: &'static [&'static str] = &VIRTUAL_PLATFORMS;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show storm-control")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let interfaces = path::require_object(single_output(outputs)?.json()?, "interfaces")?;
        let mut dropped = Map::new();

        for (name, details) in interfaces {
            let Some(traffic_types) = path::get_object(details, "trafficTypes") else {
                continue;
            };
            let drops: Map<String, Value> = traffic_types
                .iter()
                .filter_map(|(traffic, counters)| {
                    let drop = counters.get("drop")?;
                    (drop.as_f64() != Some(0.0)).then(|| (traffic.clone(), drop.clone()))
                })
                .collect();
            if !drops.is_empty() {
                dropped.insert(name.clone(), Value::Object(drops));
            }
        }

        if !dropped.is_empty() {
            result.mark_failure(format!(
                "The following interfaces have non-zero storm-control drop counters: {}",
                Value::Object(dropped)
            ));
        }
        Ok(())
    }
}

/// Verifies no port-channel has inactive member ports.
pub struct VerifyPortChannels;

impl DeviceCheck for VerifyPortChannels {
    type Input = NoInput;
    const NAME: &'static str = "VerifyPortChannels";
    const DESCRIPTION: &'static str = "Verifies there is no inactive port in port channels.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;
    const SKIP_ON_PLATFORMS: &'static [&'static str] = &VIRTUAL_PLATFORMS;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show port-channel")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let port_channels = path::require_object(single_output(outputs)?.json()?, "portChannels")?;
        let mut inactive = Map::new();

        for (name, details) in port_channels {
            let Some(ports) = details.get("inactivePorts") else {
                continue;
            };
            let count = match ports {
                Value::Object(map) => map.len(),
                Value::Array(list) => list.len(),
                _ => 0,
            };
            if count > 0 {
                inactive.insert(name.clone(), ports.clone());
            }
        }

        if !inactive.is_empty() {
            result.mark_failure(format!(
                "The following port-channels have inactive port(s): {}",
                Value::Object(inactive)
            ));
        }
        Ok(())
    }
}

/// Verifies no illegal LACP packets were received.
pub struct VerifyIllegalLacp;

impl DeviceCheck for VerifyIllegalLacp {
    type Input = NoInput;
    const NAME: &'static str = "VerifyIllegalLACP";
    const DESCRIPTION: &'static str = "Verifies there is no illegal LACP packets received.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show lacp counters all-ports")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let port_channels = path::require_object(single_output(outputs)?.json()?, "portChannels")?;
        let mut illegal = Vec::new();

        for (port_channel, details) in port_channels {
            let Some(members) = path::get_object(details, "interfaces") else {
                continue;
            };
            for (member, counters) in members {
                let count = path::get_u64(counters, "illegalRxCount").unwrap_or(0);
                if count != 0 {
                    illegal.push(keyed(port_channel, Value::String(member.clone())));
                }
            }
        }

        if !illegal.is_empty() {
            result.mark_failure(format!(
                "The following port-channels have received illegal LACP packets on the following ports: {}",
                Value::Array(illegal)
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoopbackCountInput {
    /// Number of loopback interfaces expected to be present
    pub number: u32,
}

impl ValidateInput for LoopbackCountInput {}

/// Verifies the number of loopbacks and that none is down.
pub struct VerifyLoopbackCount;

impl DeviceCheck for VerifyLoopbackCount {
    type Input = LoopbackCountInput;
    const NAME: &'static str = "VerifyLoopbackCount";
    const DESCRIPTION: &'static str =
        "Verifies the number of loopback interfaces on the device is the one we expect and if none of the loopback is down.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &LoopbackCountInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show ip interface brief")])
    }

    fn test(input: &LoopbackCountInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let interfaces = path::require_object(single_output(outputs)?.json()?, "interfaces")?;
        let loopbacks: Vec<(&String, &Value)> = interfaces
            .iter()
            .filter(|(name, _)| name.contains("Loopback"))
            .collect();
        let down: Vec<&str> = loopbacks
            .iter()
            .filter(|(_, details)| !is_up(details))
            .map(|(name, _)| name.as_str())
            .collect();

        if loopbacks.len() as u64 != u64::from(input.number) {
            result.mark_failure(format!(
                "Found {} Loopbacks when expecting {}",
                loopbacks.len(),
                input.number
            ));
        }
        if !down.is_empty() {
            result.mark_failure(format!("The following Loopbacks are not up: {}", name_list(&down)));
        }
        Ok(())
    }
}

/// Verifies no VLAN interface is down.
pub struct VerifySvi;

impl DeviceCheck for VerifySvi {
    type Input = NoInput;
    const NAME: &'static str = "VerifySVI";
    const DESCRIPTION: &'static str = "Verifies there is no interface vlan down.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &NoInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show ip interface brief")])
    }

    fn test(_: &NoInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let interfaces = path::require_object(single_output(outputs)?.json()?, "interfaces")?;
        let down: Vec<&str> = interfaces
            .iter()
            .filter(|(name, details)| name.contains("Vlan") && !is_up(details))
            .map(|(name, _)| name.as_str())
            .collect();

        if !down.is_empty() {
            result.mark_failure(format!("The following SVIs are not up: {}", name_list(&down)));
        }
        Ok(())
    }
}

fn default_ignored_interfaces() -> Vec<String> {
    DEFAULT_IGNORED_INTERFACES.iter().map(|s| s.to_string()).collect()
}

fn default_l3_mtu() -> u32 {
    DEFAULT_L3_MTU
}

fn default_l2_mtu() -> u32 {
    DEFAULT_L2_MTU
}

fn validate_ignored(ignored: &[String]) -> Result<(), String> {
    match ignored
        .iter()
        .find(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphabetic()))
    {
        Some(bad) => Err(format!("ignored interface '{}' is not an interface type prefix", bad)),
        None => Ok(()),
    }
}

/// Interfaces with the given forwarding model whose MTU differs from what
/// the classifier expects of them.
fn wrong_mtu(
    doc: &Value,
    forwarding_model: &str,
    default: u32,
    ignored: &[String],
    overrides: &OverrideTable<u32>,
    result: &mut CheckResult,
) -> Result<Vec<Value>, EvalError> {
    let interfaces = path::require_object(doc, "interfaces")?;
    let mut wrong = Vec::new();

    for (name, details) in interfaces {
        if path::get_str(details, "forwardingModel") != Some(forwarding_model) {
            continue;
        }

        let expected = match classify(name, ignored, overrides, &default) {
            Ok(Classification::Ignored) => continue,
            Ok(Classification::Expect(mtu)) => mtu,
            Err(e) => {
                result.mark_failure(e.to_string());
                continue;
            }
        };

        if path::get_u64(details, "mtu") != Some(u64::from(expected)) {
            let actual = details.get("mtu").cloned().unwrap_or(Value::Null);
            wrong.push(keyed(name, actual));
        }
    }

    Ok(wrong)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct L3MtuInput {
    /// MTU expected on every routed interface without an override
    #[serde(default = "default_l3_mtu")]
    pub mtu: u32,
    /// Interface type prefixes to leave out
    #[serde(default = "default_ignored_interfaces")]
    pub ignored_interfaces: Vec<String>,
    /// Per-interface MTU, first entry wins
    #[serde(default)]
    pub specific_mtu: OverrideTable<u32>,
}

impl ValidateInput for L3MtuInput {
    fn validate(&self) -> Result<(), String> {
        validate_ignored(&self.ignored_interfaces)
    }
}

/// Verifies the MTU of routed interfaces.
pub struct VerifyL3Mtu;

impl DeviceCheck for VerifyL3Mtu {
    type Input = L3MtuInput;
    const NAME: &'static str = "VerifyL3MTU";
    const DESCRIPTION: &'static str =
        "Verifies the global layer 3 Maximum Transfer Unit (MTU) for all layer 3 interfaces.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &L3MtuInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces")])
    }

    fn test(input: &L3MtuInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;
        let wrong = wrong_mtu(doc, "routed", input.mtu, &input.ignored_interfaces, &input.specific_mtu, result)?;
        if !wrong.is_empty() {
            result.mark_failure(format!(
                "Some interfaces do not have correct MTU configured:\n{}",
                Value::Array(wrong)
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct L2MtuInput {
    /// MTU expected on every bridged interface without an override
    #[serde(default = "default_l2_mtu")]
    pub mtu: u32,
    /// Interface type prefixes to leave out
    #[serde(default = "default_ignored_interfaces")]
    pub ignored_interfaces: Vec<String>,
    /// Per-interface MTU, first entry wins
    #[serde(default)]
    pub specific_mtu: OverrideTable<u32>,
}

impl ValidateInput for L2MtuInput {
    fn validate(&self) -> Result<(), String> {
        validate_ignored(&self.ignored_interfaces)
    }
}

/// Verifies the MTU of bridged interfaces.
pub struct VerifyL2Mtu;

impl DeviceCheck for VerifyL2Mtu {
    type Input = L2MtuInput;
    const NAME: &'static str = "VerifyL2MTU";
    const DESCRIPTION: &'static str =
        "Verifies the global layer 2 Maximum Transfer Unit (MTU) for all layer 2 interfaces.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &L2MtuInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces")])
    }

    fn test(input: &L2MtuInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;
        let wrong = wrong_mtu(doc, "bridged", input.mtu, &input.ignored_interfaces, &input.specific_mtu, result)?;
        if !wrong.is_empty() {
            result.mark_failure(format!(
                "Some L2 interfaces do not have correct MTU configured:\n{}",
                Value::Array(wrong)
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyArpInput {
    pub interfaces: Vec<Interface>,
}

impl ValidateInput for ProxyArpInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.interfaces, "interfaces")
    }
}

/// Verifies proxy-ARP is enabled on the listed interfaces.
pub struct VerifyIpProxyArp;

impl DeviceCheck for VerifyIpProxyArp {
    type Input = ProxyArpInput;
    const NAME: &'static str = "VerifyIPProxyARP";
    const DESCRIPTION: &'static str = "Verifies if Proxy-ARP is enabled for the provided list of interface(s).";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(input: &ProxyArpInput) -> Result<Vec<Command>, TemplateError> {
        let bindings: Vec<_> = input
            .interfaces
            .iter()
            .map(|intf| params([("intf", intf)]))
            .collect();
        CommandTemplate::new("show ip interface {intf}").render(&bindings)
    }

    fn test(_: &ProxyArpInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let mut disabled = Vec::new();

        for output in outputs {
            let intf = output.param("intf")?;
            let Some(details) = path::resolve(output.json()?, &format!("interfaces;{}", intf), ';') else {
                result.mark_failure(format!("Interface `{}` not found.", intf));
                continue;
            };
            if path::get(details, "proxyArp").and_then(Value::as_bool) != Some(true) {
                disabled.push(intf);
            }
        }

        if !disabled.is_empty() {
            result.mark_failure(format!(
                "The following interface(s) have Proxy-ARP disabled: {}",
                name_list(&disabled)
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceAddressInput {
    pub name: Interface,
    pub primary_ip: Ipv4Prefix,
    #[serde(default)]
    pub secondary_ips: Option<Vec<Ipv4Prefix>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceIpv4Input {
    pub interfaces: Vec<InterfaceAddressInput>,
}

impl ValidateInput for InterfaceIpv4Input {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.interfaces, "interfaces")
    }
}

/// Verifies primary and secondary IPv4 addresses of the listed interfaces.
pub struct VerifyInterfaceIpv4;

impl VerifyInterfaceIpv4 {
    /// `address/maskLen` from an address record.
    fn prefix(record: &Value) -> Option<String> {
        let address = path::get_str(record, "address")?;
        let len = path::get_u64(record, "maskLen")?;
        Some(format!("{}/{}", address, len))
    }
}

impl DeviceCheck for VerifyInterfaceIpv4 {
    type Input = InterfaceIpv4Input;
    const NAME: &'static str = "VerifyInterfaceIPv4";
    const DESCRIPTION: &'static str =
        "Verifies the interface IPv4 addresses.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(input: &InterfaceIpv4Input) -> Result<Vec<Command>, TemplateError> {
        let bindings: Vec<_> = input
            .interfaces
            .iter()
            .map(|i| params([("interface", &i.name)]))
            .collect();
        CommandTemplate::new("show ip interface {interface}").render(&bindings)
    }

    fn test(input: &InterfaceIpv4Input, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        for output in outputs {
            let name = output.param("interface")?;
            let Some(expected) = input.interfaces.iter().find(|i| i.name.as_str() == name) else {
                continue;
            };

            let doc = output.json()?;
            let primary = path::resolve(doc, &format!("interfaces;{};interfaceAddress;primaryIp", name), ';')
                .and_then(Self::prefix)
                .filter(|p| p != "0.0.0.0/0");
            let Some(primary) = primary else {
                result.mark_failure(format!("For interface `{}`, IP address is not configured.", name));
                continue;
            };

            if primary != expected.primary_ip.to_string() {
                result.mark_failure(format!(
                    "For interface `{}`, The expected primary IP address is `{}`, but the actual primary IP address is `{}`.",
                    name, expected.primary_ip, primary
                ));
            }

            let Some(expected_secondary) = &expected.secondary_ips else {
                continue;
            };
            let mut wanted: Vec<String> = expected_secondary.iter().map(|p| p.to_string()).collect();
            wanted.sort();

            let mut actual: Vec<String> = path::resolve(
                doc,
                &format!("interfaces;{};interfaceAddress;secondaryIpsOrderedList", name),
                ';',
            )
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Self::prefix).collect())
            .unwrap_or_default();
            actual.sort();

            if actual.is_empty() {
                result.mark_failure(format!(
                    "For interface `{}`, The expected secondary IP addresses are `{}`, but the actual secondary IP address is not configured.",
                    name,
                    name_list(&wanted)
                ));
            } else if actual != wanted {
                result.mark_failure(format!(
                    "For interface `{}`, The expected secondary IP addresses are `{}`, but the actual secondary IP addresses are `{}`.",
                    name,
                    name_list(&wanted),
                    name_list(&actual)
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VirtualRouterMacInput {
    pub mac_address: MacAddress,
}

impl ValidateInput for VirtualRouterMacInput {}

/// Verifies the IP virtual router MAC address.
pub struct VerifyIpVirtualRouterMac;

impl DeviceCheck for VerifyIpVirtualRouterMac {
    type Input = VirtualRouterMacInput;
    const NAME: &'static str = "VerifyIpVirtualRouterMac";
    const DESCRIPTION: &'static str = "Verifies the IP virtual router MAC address.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &VirtualRouterMacInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show ip virtual router")])
    }

    fn test(input: &VirtualRouterMacInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let macs = path::require_array(single_output(outputs)?.json()?, "virtualMacs")?;
        let configured = macs.iter().any(|entry| {
            path::get_str(entry, "macAddress")
                .map_or(false, |mac| mac.eq_ignore_ascii_case(input.mac_address.as_str()))
        });

        if !configured {
            result.mark_failure(format!(
                "IP virtual router MAC address `{}` is not configured.",
                input.mac_address
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceSpeedInput {
    pub interface: Interface,
    pub speed: SpeedInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfacesSpeedInput {
    pub interfaces: Vec<InterfaceSpeedInput>,
}

impl ValidateInput for InterfacesSpeedInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.interfaces, "interfaces")
    }
}

/// Verifies speed, lanes, auto-negotiation and full duplex.
///
/// - `auto`: auto-negotiation succeeded and full duplex
/// - `auto 10g`: as above, plus speed (and lanes when given)
/// - `forced 10g` or `10g`: full duplex and speed
/// - `100g-8`: full duplex, speed and lanes
pub struct VerifyInterfacesSpeed;

impl VerifyInterfacesSpeed {
    /// Expected and actual records with identical fields, in message order.
    fn records(spec: &SpeedSpec, details: &Value) -> (ComparisonRecord, ComparisonRecord) {
        let mut expected = ComparisonRecord::new();
        let mut actual = ComparisonRecord::new();

        let mut compare = |field: &str, want: Value, found: Option<Value>| {
            expected.insert(field, want);
            if let Some(found) = found {
                actual.insert(field, found);
            }
        };

        if spec.negotiates() {
            compare("auto negotiation", "success".into(), details.get("autoNegotiate").cloned());
        } else {
            compare("auto negotiation", NOT_APPLICABLE.into(), Some(NOT_APPLICABLE.into()));
        }

        compare("duplex mode", "duplexFull".into(), details.get("duplex").cloned());

        if spec.asserts_speed() {
            let want = match spec.speed {
                Some(gbps) => format!("{}Gbps", gbps),
                None => NOT_APPLICABLE.to_string(),
            };
            let found = path::get_u64(details, "bandwidth").map(|bps| format!("{}Gbps", speed::bps_to_gbps(bps)));
            compare("speed", want.into(), found.map(Value::from));
        } else {
            compare("speed", NOT_APPLICABLE.into(), Some(NOT_APPLICABLE.into()));
        }

        match spec.lanes {
            Some(lanes) => compare("lanes", lanes.into(), details.get("lanes").cloned()),
            None => compare("lanes", NOT_APPLICABLE.into(), Some(NOT_APPLICABLE.into())),
        }

        (expected, actual)
    }
}

impl DeviceCheck for VerifyInterfacesSpeed {
    type Input = InterfacesSpeedInput;
    const NAME: &'static str = "VerifyInterfacesSpeed";
    const DESCRIPTION: &'static str =
        "Verifies the speed, lanes, auto-negotiation status, and mode as full duplex for interfaces.";
    const CATEGORY: CheckCategory = CheckCategory::Interfaces;

    fn commands(_: &InterfacesSpeedInput) -> Result<Vec<Command>, TemplateError> {
        Ok(vec![Command::json("show interfaces")])
    }

    fn test(input: &InterfacesSpeedInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let doc = single_output(outputs)?.json()?;

        for expected in &input.interfaces {
            let name = expected.interface.as_str();
            let found = path::resolve_segments(doc, &["interfaces", name])
                .filter(|details| details.as_object().map_or(false, |map| !map.is_empty()));
            let Some(details) = found else {
                result.mark_failure(format!("Interface `{}` not found.", name));
                continue;
            };

            let (want, found) = Self::records(&expected.speed.spec(), details);
            let logs = failed_logs(&want, &found);
            if !logs.is_empty() {
                result.mark_failure(format!("For interface {}:{}", name, logs));
            }
        }
        Ok(())
    }
}
