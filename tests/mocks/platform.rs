//! Mock platform implementations for testing.
//!
//! Provides configurable mock devices that simulate:
//! - A healthy leaf switch matching [`FULL_CATALOG`] everywhere
//! - A degraded leaf with error counters, a wrong MTU, a down loopback, a
//!   down BFD session and an open management plane
//! - A lab device (virtual platform) that hardware-only checks skip
//! - Devices missing some command output

use netverify::engine::template::Command;
use netverify::platform::{Device, Output, OutputSource};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;

/// Catalog exercising every registered check.
pub const FULL_CATALOG: &str = r#"
interfaces:
  - VerifyInterfaceUtilization:
  - VerifyInterfaceErrors:
  - VerifyInterfaceDiscards:
  - VerifyInterfaceErrDisabled:
  - VerifyInterfacesStatus:
      interfaces:
        - interface: Ethernet1
          state: up
        - interface: et2
          state: adminDown
          protocol_status: down
  - VerifyStormControlDrops:
  - VerifyPortChannels:
  - VerifyIllegalLACP:
  - VerifyLoopbackCount:
      number: 2
  - VerifySVI:
  - VerifyL3MTU:
      mtu: 1500
      specific_mtu:
        - Ethernet5: 9000
  - VerifyIPProxyARP:
      interfaces: [Ethernet1, Ethernet5]
  - VerifyL2MTU:
      mtu: 9214
  - VerifyInterfaceIPv4:
      interfaces:
        - name: Ethernet1
          primary_ip: 10.0.0.0/31
          secondary_ips: [10.1.0.0/31]
  - VerifyIpVirtualRouterMac:
      mac_address: "00:1c:73:00:dc:01"
  - VerifyInterfacesSpeed:
      interfaces:
        - interface: Ethernet1
          speed: auto 10g-4
vlan:
  - VerifyVlanInternalPolicy:
      policy: ascending
      start_vlan_id: 1006
      end_vlan_id: 4094
services:
  - VerifyDNSServers:
      dns_servers:
        - server_address: 10.14.0.1
          priority: 0
stun:
  - VerifyStunClient:
      stun_clients:
        - source_address: 100.64.3.2
          public_address: 192.164.3.2
          port: 4500
bfd:
  - VerifyBFDSpecificPeers:
      bfd_peers:
        - peer: 192.0.255.8
          source_address: 192.0.255.7
  - VerifyBFDPeersIntervals:
      bfd_peers:
        - peer: 192.0.255.8
          source_address: 192.0.255.7
          tx_interval: 1200000
          rx_interval: 1200000
          multiplier: 3
security:
  - VerifySSHStatus:
  - VerifySSHIPv4Acl:
      number: 1
      vrf: MGMT
  - VerifySSHIPv6Acl:
      number: 1
      vrf: MGMT
  - VerifyTelnetStatus:
  - VerifyAPIHttpStatus:
  - VerifyAPIHttpsSSL:
      profile: API_SSL_Profile
  - VerifyAPIIPv4Acl:
      number: 1
      vrf: MGMT
  - VerifyAPIIPv6Acl:
      number: 1
      vrf: MGMT
  - VerifyAPISSLCertificate:
      certificate: ARISTA_ROOT_CA.crt
      expiry_limit: 30
      subject_name: Arista Networks Internal IT Root Cert Authority
      encryption: RSA
      size: 4096
"#;

/// Number of entries in [`FULL_CATALOG`].
pub const FULL_CATALOG_CHECKS: usize = 30;

/// Device health for mock configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockHealth {
    Healthy,
    Degraded,
}

/// Mock device answering from an in-memory command table.
#[derive(Debug)]
pub struct MockDevice {
    device: Device,
    outputs: HashMap<String, Output>,
    requested: RefCell<Vec<String>>,
}

impl MockDevice {
    /// A device with no output at all
    pub fn empty(name: &str) -> Self {
        MockDevice {
            device: Device::new(name),
            outputs: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    /// A leaf switch whose output satisfies every check in [`FULL_CATALOG`]
    pub fn healthy(name: &str) -> Self {
        Self::empty(name)
            .with_model("DCS-7280SR3-48YC8")
            .with_text("show interfaces counters rates", rates("10.0%", "5.0%"))
            .with_json(
                "show interfaces counters errors",
                json!({"interfaceErrorCounters": {
                    "Ethernet1": {"inErrors": 0, "frameTooLongs": 0, "fcsErrors": 0, "outErrors": 0, "alignmentErrors": 0, "symbolErrors": 0}
                }}),
            )
            .with_json(
                "show interfaces counters discards",
                json!({"interfaces": {"Ethernet1": {"outDiscards": 0, "inDiscards": 0}}, "inDiscardsTotal": 0, "outDiscardsTotal": 0}),
            )
            .with_json(
                "show interfaces status",
                json!({"interfaceStatuses": {
                    "Ethernet1": {"linkStatus": "connected"},
                    "Ethernet2": {"linkStatus": "disabled"}
                }}),
            )
            .with_json(
                "show interfaces description",
                json!({"interfaceDescriptions": {
                    "Ethernet1": {"interfaceStatus": "up", "lineProtocolStatus": "up", "description": "uplink"},
                    "Ethernet2": {"interfaceStatus": "adminDown", "lineProtocolStatus": "down", "description": ""}
                }}),
            )
            .with_json(
                "show storm-control",
                json!({"interfaces": {"Ethernet1": {"trafficTypes": {"broadcast": {"level": 100, "drop": 0}}}}}),
            )
            .with_json(
                "show port-channel",
                json!({"portChannels": {"Port-Channel1": {"activePorts": {"Ethernet3": {}}, "inactivePorts": {}}}}),
            )
            .with_json(
                "show lacp counters all-ports",
                json!({"portChannels": {"Port-Channel1": {"interfaces": {"Ethernet3": {"illegalRxCount": 0}}}}}),
            )
            .with_json("show ip interface brief", ip_brief(&[("Loopback1", "up", "connected")]))
            .with_json("show interfaces", show_interfaces(9000, 4))
            .with_json("show ip interface Ethernet1", ip_interface("Ethernet1", true, "10.0.0.0"))
            .with_json("show ip interface Ethernet5", ip_interface("Ethernet5", true, "10.0.0.4"))
            .with_json(
                "show ip virtual router",
                json!({"virtualMacs": [{"macAddress": "00:1c:73:00:dc:01", "macType": "varp"}]}),
            )
            .with_json(
                "show vlan internal allocation policy",
                json!({"policy": "ascending", "startVlanId": 1006, "endVlanId": 4094}),
            )
            .with_json(
                "show ip name-server",
                json!({"nameServerConfigs": [{"ipAddr": "10.14.0.1", "vrf": "default", "priority": 0}]}),
            )
            .with_json("show stun client translations 100.64.3.2 4500", stun_binding(4500))
            .with_json("show bfd peers dest-ip 192.0.255.8 vrf default", bfd_peer("up", 1_200_000))
            .with_json("show bfd peers dest-ip 192.0.255.8 vrf default detail", bfd_peer("up", 1_200_000))
            .with_text("show management ssh", ssh_status("disabled"))
            .with_json("show management ssh ip access-list summary", acls("ipAclList", "ACL_IPV4_SSH", "MGMT"))
            .with_json("show management ssh ipv6 access-list summary", acls("ipv6AclList", "ACL_IPV6_SSH", "MGMT"))
            .with_json("show management telnet", json!({"serverState": "disabled", "vrfName": "default"}))
            .with_json("show management api http-commands", http_commands(false, "API_SSL_Profile"))
            .with_json(
                "show management api http-commands ip access-list summary",
                acls("ipAclList", "ACL_IPV4_API", "MGMT"),
            )
            .with_json(
                "show management api http-commands ipv6 access-list summary",
                acls("ipv6AclList", "ACL_IPV6_API", "MGMT"),
            )
            .with_json("show management security ssl certificate", certificates(2_127_420_899))
            .with_json("show clock", json!({"utcTime": CLOCK, "timezone": "UTC"}))
    }

    /// A leaf switch failing every check in [`FULL_CATALOG`] except `VerifyL2MTU`
    pub fn degraded(name: &str) -> Self {
        Self::healthy(name)
            .with_text("show interfaces counters rates", rates("10.0%", "80.0%"))
            .with_json(
                "show interfaces counters errors",
                json!({"interfaceErrorCounters": {"Ethernet1": {"inErrors": 42, "outErrors": 0}}}),
            )
            .with_json(
                "show interfaces counters discards",
                json!({"interfaces": {"Ethernet1": {"outDiscards": 7, "inDiscards": 0}}}),
            )
            .with_json(
                "show interfaces status",
                json!({"interfaceStatuses": {"Ethernet1": {"linkStatus": "errdisabled"}}}),
            )
            .with_json(
                "show interfaces description",
                json!({"interfaceDescriptions": {
                    "Ethernet1": {"interfaceStatus": "down", "lineProtocolStatus": "down"},
                    "Ethernet2": {"interfaceStatus": "adminDown", "lineProtocolStatus": "down"}
                }}),
            )
            .with_json(
                "show storm-control",
                json!({"interfaces": {"Ethernet1": {"trafficTypes": {"broadcast": {"level": 100, "drop": 5}}}}}),
            )
            .with_json(
                "show port-channel",
                json!({"portChannels": {"Port-Channel1": {"inactivePorts": {"Ethernet4": {"reasonUnconfigured": "waiting for LACP response"}}}}}),
            )
            .with_json(
                "show lacp counters all-ports",
                json!({"portChannels": {"Port-Channel1": {"interfaces": {"Ethernet3": {"illegalRxCount": 3}}}}}),
            )
            .with_json(
                "show ip interface brief",
                ip_brief(&[("Loopback1", "down", "notconnect"), ("Vlan20", "down", "notconnect")]),
            )
            .with_json("show interfaces", show_interfaces(1500, 2))
            .with_json("show ip interface Ethernet1", ip_interface("Ethernet1", false, "10.0.0.2"))
            .with_json("show ip virtual router", json!({"virtualMacs": []}))
            .with_json(
                "show vlan internal allocation policy",
                json!({"policy": "descending", "startVlanId": 1006, "endVlanId": 4094}),
            )
            .with_json(
                "show ip name-server",
                json!({"nameServerConfigs": [{"ipAddr": "10.14.0.1", "vrf": "MGMT", "priority": 0}]}),
            )
            .with_json("show stun client translations 100.64.3.2 4500", stun_binding(6006))
            .with_json("show bfd peers dest-ip 192.0.255.8 vrf default", bfd_peer("down", 1_200_000))
            .with_json("show bfd peers dest-ip 192.0.255.8 vrf default detail", bfd_peer("up", 300_000))
            .with_text("show management ssh", ssh_status("enabled"))
            .with_json("show management ssh ip access-list summary", json!({"ipAclList": {"aclList": []}}))
            .with_json("show management ssh ipv6 access-list summary", acls("ipv6AclList", "ACL_IPV6_SSH", "default"))
            .with_json("show management telnet", json!({"serverState": "enabled", "vrfName": "default"}))
            .with_json("show management api http-commands", http_commands(true, "Default_Profile"))
            .with_json(
                "show management api http-commands ip access-list summary",
                json!({"ipAclList": {"aclList": []}}),
            )
            .with_json(
                "show management api http-commands ipv6 access-list summary",
                acls("ipv6AclList", "ACL_IPV6_API", "default"),
            )
            .with_json("show management security ssl certificate", certificates(CLOCK as i64 - 2 * 86_400))
    }

    /// Build a device for the given health state
    pub fn with_health(name: &str, health: MockHealth) -> Self {
        match health {
            MockHealth::Healthy => Self::healthy(name),
            MockHealth::Degraded => Self::degraded(name),
        }
    }

    /// A healthy device running on a virtual platform
    pub fn lab(name: &str) -> Self {
        Self::healthy(name).with_model("cEOSLab")
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.device = self.device.with_model(model);
        self
    }

    pub fn with_json(mut self, command: &str, output: Value) -> Self {
        self.outputs.insert(command.to_string(), Output::Json(output));
        self
    }

    pub fn with_text(mut self, command: &str, output: impl Into<String>) -> Self {
        self.outputs.insert(command.to_string(), Output::Text(output.into()));
        self
    }

    /// Drop the output of one command
    pub fn without(mut self, command: &str) -> Self {
        self.outputs.remove(command);
        self
    }

    /// Commands the engine asked for, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    /// Snapshot file contents for this device
    pub fn snapshot_json(&self) -> String {
        let outputs: serde_json::Map<String, Value> = self
            .outputs
            .iter()
            .map(|(command, output)| {
                let value = match output {
                    Output::Json(value) => value.clone(),
                    Output::Text(text) => Value::String(text.clone()),
                };
                (command.clone(), value)
            })
            .collect();
        json!({"device": self.device, "outputs": outputs}).to_string()
    }
}

impl OutputSource for MockDevice {
    fn device(&self) -> &Device {
        &self.device
    }

    fn output(&self, command: &Command) -> Option<Output> {
        self.requested.borrow_mut().push(command.text.clone());
        self.outputs.get(&command.text).cloned()
    }
}

fn rates(in_pct: &str, out_pct: &str) -> String {
    format!(
        "Port      Name        Intvl   In Mbps      %  In Kpps  Out Mbps      % Out Kpps\n\
         Et1       uplink       5:00    1000.0  {}       88     500.0  {}       44\n\
         Et2                    5:00       0.0      -        0       0.0      -        0\n",
        in_pct, out_pct
    )
}

fn ip_brief(extra: &[(&str, &str, &str)]) -> Value {
    let mut interfaces = serde_json::Map::new();
    for (name, proto, status) in [
        ("Ethernet1", "up", "connected"),
        ("Loopback0", "up", "connected"),
        ("Vlan10", "up", "connected"),
    ]
    .iter()
    .chain(extra)
    {
        interfaces.insert(
            name.to_string(),
            json!({"lineProtocolStatus": proto, "interfaceStatus": status}),
        );
    }
    json!({ "interfaces": interfaces })
}

fn show_interfaces(ethernet5_mtu: u32, lanes: u32) -> Value {
    json!({"interfaces": {
        "Ethernet1": {
            "forwardingModel": "routed", "mtu": 1500, "autoNegotiate": "success",
            "duplex": "duplexFull", "bandwidth": 10_000_000_000u64, "lanes": lanes
        },
        "Ethernet5": {"forwardingModel": "routed", "mtu": ethernet5_mtu},
        "Ethernet10": {"forwardingModel": "bridged", "mtu": 9214},
        "Loopback0": {"forwardingModel": "routed", "mtu": 65535},
        "Management0": {"forwardingModel": "routed", "mtu": 1500}
    }})
}

fn ip_interface(name: &str, proxy_arp: bool, primary: &str) -> Value {
    let mut interfaces = serde_json::Map::new();
    interfaces.insert(
        name.to_string(),
        json!({
            "proxyArp": proxy_arp,
            "interfaceAddress": {
                "primaryIp": {"address": primary, "maskLen": 31},
                "secondaryIpsOrderedList": [{"address": "10.1.0.0", "maskLen": 31}]
            }
        }),
    );
    json!({ "interfaces": interfaces })
}

fn stun_binding(public_port: u16) -> Value {
    json!({"bindings": {"000000010a64ff0100000000": {
        "sourceAddress": {"ip": "100.64.3.2", "port": 4500},
        "publicAddress": {"ip": "192.164.3.2", "port": public_port}
    }}})
}

/// Device clock, seconds since the epoch.
const CLOCK: f64 = 1_702_288_467.673_651_5;

fn bfd_peer(status: &str, interval: u64) -> Value {
    json!({"vrfs": {"default": {"ipv4Neighbors": {"192.0.255.8": {"peers": {"": {"types": {
        "normal": {"peerStats": {"192.0.255.7": {
            "status": status,
            "remoteDisc": 3_940_685_114u64,
            "peerStatsDetail": {"operTxInterval": interval, "operRxInterval": interval, "detectMult": 3}
        }}}
    }}}}}}}})
}

fn ssh_status(status: &str) -> String {
    format!(
        "SSHD status for Default VRF is {}\nSSH connection limit is 50\nSSH per host connection limit is 20\nFIPS status: disabled\n\n",
        status
    )
}

fn acls(key: &str, name: &str, vrf: &str) -> Value {
    let mut doc = serde_json::Map::new();
    doc.insert(
        key.to_string(),
        json!({"aclList": [{"type": "Ip4Acl", "name": name, "configuredVrfs": [vrf], "activeVrfs": [vrf]}]}),
    );
    Value::Object(doc)
}

fn http_commands(http_running: bool, profile: &str) -> Value {
    json!({
        "enabled": true,
        "httpServer": {"configured": http_running, "running": http_running, "port": 80},
        "httpsServer": {"configured": true, "running": true, "port": 443},
        "sslProfile": {"name": profile, "configured": true, "state": "valid"}
    })
}

fn certificates(not_after: i64) -> Value {
    json!({"certificates": {"ARISTA_ROOT_CA.crt": {
        "subject": {"commonName": "Arista Networks Internal IT Root Cert Authority"},
        "notBefore": 1_496_268_302i64,
        "notAfter": not_after,
        "publicKey": {"encryptionAlgorithm": "RSA", "size": 4096}
    }}})
}
