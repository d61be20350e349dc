//! BFD checks.
//!
//! Both checks look a peer up under
//! `vrfs.<vrf>.<family>Neighbors.<peer>.peers."".types`, prefer the `normal`
//! session type over `multihop`, and read the stats kept for the declared
//! source address.

use super::{keyed, non_empty};
use crate::engine::orchestrator::{CheckDescriptor, CommandOutput, DeviceCheck, ValidateInput};
use crate::engine::path;
use crate::engine::template::{params, Command, CommandTemplate, TemplateError};
use crate::engine::EvalError;
use crate::{CheckCategory, CheckResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::net::IpAddr;

/// Get all BFD checks
pub fn descriptors() -> Vec<CheckDescriptor> {
    vec![
        CheckDescriptor::of::<VerifyBfdSpecificPeers>(),
        CheckDescriptor::of::<VerifyBfdPeersIntervals>(),
    ]
}

const NOT_CONFIGURED: &str = "Not Configured";

fn default_vrf() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BfdPeer {
    pub peer: IpAddr,
    #[serde(default = "default_vrf")]
    pub vrf: String,
    pub source_address: IpAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BfdPeersInput {
    pub bfd_peers: Vec<BfdPeer>,
}

impl ValidateInput for BfdPeersInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.bfd_peers, "bfd_peers")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BfdPeerTimers {
    pub peer: IpAddr,
    #[serde(default = "default_vrf")]
    pub vrf: String,
    pub source_address: IpAddr,
    /// Microseconds
    pub tx_interval: u64,
    /// Microseconds
    pub rx_interval: u64,
    pub multiplier: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BfdPeersIntervalsInput {
    pub bfd_peers: Vec<BfdPeerTimers>,
}

impl ValidateInput for BfdPeersIntervalsInput {
    fn validate(&self) -> Result<(), String> {
        non_empty(&self.bfd_peers, "bfd_peers")?;
        match self.bfd_peers.iter().find(|p| p.multiplier == 0) {
            Some(bad) => Err(format!("multiplier for BFD peer {} must be at least 1", bad.peer)),
            None => Ok(()),
        }
    }
}

/// Stats of the session from `source` to `peer`, if the device has one.
fn peer_stats<'a>(doc: &'a Value, vrf: &str, peer: IpAddr, source: IpAddr) -> Option<&'a Map<String, Value>> {
    let family = if peer.is_ipv4() { "ipv4Neighbors" } else { "ipv6Neighbors" };
    let peer = peer.to_string();
    let types = path::resolve_segments(doc, &["vrfs", vrf, family, peer.as_str(), "peers", "", "types"])?;

    let session = types.get("normal").or_else(|| types.get("multihop"))?;
    let stats = path::resolve_segments(session, &["peerStats", source.to_string().as_str()])?;
    stats.as_object().filter(|s| !s.is_empty())
}

/// Verifies BFD peer sessions are up with a non-zero remote discriminator.
pub struct VerifyBfdSpecificPeers;

impl DeviceCheck for VerifyBfdSpecificPeers {
    type Input = BfdPeersInput;
    const NAME: &'static str = "VerifyBFDSpecificPeers";
    const DESCRIPTION: &'static str =
        "Verifies if the BFD peer's sessions are UP and remote disc is non-zero in the specified VRF.";
    const CATEGORY: CheckCategory = CheckCategory::Bfd;

    fn commands(input: &BfdPeersInput) -> Result<Vec<Command>, TemplateError> {
        let bindings: Vec<_> = input
            .bfd_peers
            .iter()
            .map(|p| params([("peer", p.peer.to_string()), ("vrf", p.vrf.clone())]))
            .collect();
        CommandTemplate::new("show bfd peers dest-ip {peer} vrf {vrf}").render(&bindings)
    }

    fn test(input: &BfdPeersInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let mut failures = Map::new();

        for (peer, output) in input.bfd_peers.iter().zip(outputs) {
            let Some(stats) = peer_stats(output.json()?, &peer.vrf, peer.peer, peer.source_address) else {
                failures.insert(peer.peer.to_string(), keyed(&peer.vrf, json!(NOT_CONFIGURED)));
                continue;
            };

            let status = stats.get("status").cloned().unwrap_or(Value::Null);
            let remote_disc = stats.get("remoteDisc").cloned().unwrap_or(Value::Null);
            if status != "up" || remote_disc == 0 {
                failures.insert(
                    peer.peer.to_string(),
                    keyed(&peer.vrf, json!({"status": status, "remote_disc": remote_disc})),
                );
            }
        }

        if !failures.is_empty() {
            result.mark_failure(format!(
                "Following BFD peers are not configured, status is not up or remote disc is zero:\n{}",
                Value::Object(failures)
            ));
        }
        Ok(())
    }
}

/// Verifies the operational timers of BFD peers.
pub struct VerifyBfdPeersIntervals;

impl DeviceCheck for VerifyBfdPeersIntervals {
    type Input = BfdPeersIntervalsInput;
    const NAME: &'static str = "VerifyBFDPeersIntervals";
    const DESCRIPTION: &'static str = "Verifies the timers of the BFD peers in the specified VRF.";
    const CATEGORY: CheckCategory = CheckCategory::Bfd;

    fn commands(input: &BfdPeersIntervalsInput) -> Result<Vec<Command>, TemplateError> {
        let bindings: Vec<_> = input
            .bfd_peers
            .iter()
            .map(|p| params([("peer", p.peer.to_string()), ("vrf", p.vrf.clone())]))
            .collect();
        CommandTemplate::new("show bfd peers dest-ip {peer} vrf {vrf} detail").render(&bindings)
    }

    fn test(input: &BfdPeersIntervalsInput, outputs: &[CommandOutput], result: &mut CheckResult) -> Result<(), EvalError> {
        let mut failures = Map::new();

        for (peer, output) in input.bfd_peers.iter().zip(outputs) {
            let Some(stats) = peer_stats(output.json()?, &peer.vrf, peer.peer, peer.source_address) else {
                failures.insert(peer.peer.to_string(), keyed(&peer.vrf, json!(NOT_CONFIGURED)));
                continue;
            };

            let detail = stats.get("peerStatsDetail").cloned().unwrap_or(Value::Null);
            let read = |field: &str| detail.get(field).cloned().unwrap_or(Value::Null);
            let (tx, rx, mult) = (read("operTxInterval"), read("operRxInterval"), read("detectMult"));

            if tx != peer.tx_interval || rx != peer.rx_interval || mult != peer.multiplier {
                failures.insert(
                    peer.peer.to_string(),
                    keyed(&peer.vrf, json!({"tx_interval": tx, "rx_interval": rx, "multiplier": mult})),
                );
            }
        }

        if !failures.is_empty() {
            result.mark_failure(format!(
                "Following BFD peers are not configured or timers are not correct:\n{}",
                Value::Object(failures)
            ));
        }
        Ok(())
    }
}
