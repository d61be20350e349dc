//! Declared-input types.
//!
//! Every value read from a catalog is validated here, at deserialization,
//! so check bodies only ever see well-formed inputs.

use crate::data::interfaces::{canonical_type, INTERFACE_PATTERN};
use crate::engine::speed::{self, SpeedSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

static INTERFACE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(INTERFACE_PATTERN).expect("interface pattern is valid"));

static MAC_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{2}(:[0-9a-f]{2}){5}$").expect("mac pattern is valid"));

/// Canonical interface name.
///
/// Accepts common abbreviations in any case (`et1/1`, `Po10`, `lo0`) and
/// stores the canonical form (`Ethernet1/1`, `Port-Channel10`, `Loopback0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interface(String);

impl Interface {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Interface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (kind, id) = trimmed.split_at(split);

        let name = match canonical_type(kind.trim()) {
            Some(full) => format!("{}{}", full, id),
            None => trimmed.to_string(),
        };

        if INTERFACE_NAME.is_match(&name) {
            Ok(Interface(name))
        } else {
            Err(format!("'{}' is not a valid interface name", s))
        }
    }
}

impl TryFrom<String> for Interface {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interface> for String {
    fn from(interface: Interface) -> Self {
        interface.0
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expected administrative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceState {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "adminDown")]
    AdminDown,
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceState::Up => write!(f, "up"),
            InterfaceState::AdminDown => write!(f, "adminDown"),
        }
    }
}

/// Expected line protocol status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolStatus {
    #[default]
    Up,
    Down,
}

impl fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolStatus::Up => write!(f, "up"),
            ProtocolStatus::Down => write!(f, "down"),
        }
    }
}

/// Speed declaration such as `auto`, `auto 10g-4`, `100g-8` or `forced 10g`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpeedInput(String);

impl SpeedInput {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalized form.
    pub fn spec(&self) -> SpeedSpec {
        speed::parse(&self.0)
    }
}

impl TryFrom<String> for SpeedInput {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if speed::is_valid_input(&value) {
            Ok(SpeedInput(value))
        } else {
            Err(format!(
                "'{}' is not a speed such as auto, 10g, auto 25g-4 or forced 100g",
                value
            ))
        }
    }
}

impl From<SpeedInput> for String {
    fn from(speed: SpeedInput) -> Self {
        speed.0
    }
}

impl fmt::Display for SpeedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// VLAN identifier, 0 to 4094.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Vlan(u16);

impl Vlan {
    pub const MAX: u16 = 4094;

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Vlan {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value <= Self::MAX {
            Ok(Vlan(value))
        } else {
            Err(format!("VLAN {} is out of range 0-{}", value, Self::MAX))
        }
    }
}

impl From<Vlan> for u16 {
    fn from(vlan: Vlan) -> Self {
        vlan.0
    }
}

impl fmt::Display for Vlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal VLAN allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VlanPolicy {
    Ascending,
    Descending,
}

impl VlanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VlanPolicy::Ascending => "ascending",
            VlanPolicy::Descending => "descending",
        }
    }
}

impl fmt::Display for VlanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// IPv4 address with prefix length, `10.0.0.1/31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Prefix {
    pub address: Ipv4Addr,
    pub len: u8,
}

impl FromStr for Ipv4Prefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{}' is not an IPv4 address with prefix length", s);
        let (address, len) = s.trim().split_once('/').ok_or_else(invalid)?;
        let address: Ipv4Addr = address.parse().map_err(|_| invalid())?;
        let len: u8 = len.parse().map_err(|_| invalid())?;
        if len > 32 {
            return Err(invalid());
        }
        Ok(Ipv4Prefix { address, len })
    }
}

impl TryFrom<String> for Ipv4Prefix {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ipv4Prefix> for String {
    fn from(prefix: Ipv4Prefix) -> Self {
        prefix.to_string()
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.len)
    }
}

/// MAC address in colon-separated form, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MacAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let lower = value.trim().to_ascii_lowercase();
        if MAC_ADDRESS.is_match(&lower) {
            Ok(MacAddress(lower))
        } else {
            Err(format!("'{}' is not a MAC address", value))
        }
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DNS server priority, 0 (first) to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DnsPriority(u8);

impl DnsPriority {
    pub const MAX: u8 = 4;

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DnsPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= Self::MAX {
            Ok(DnsPriority(value))
        } else {
            Err(format!("priority {} is out of range 0-{}", value, Self::MAX))
        }
    }
}

impl From<DnsPriority> for u8 {
    fn from(priority: DnsPriority) -> Self {
        priority.0
    }
}

impl fmt::Display for DnsPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
