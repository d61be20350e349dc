//! Interface naming tables
//!
//! Canonical interface types, the abbreviations accepted in declared inputs,
//! and defaults shared by the interface checks.

/// Canonical interface type names, longest first where one is a prefix of
/// another.
pub const INTERFACE_TYPES: [&str; 9] = [
    "Port-Channel",
    "Management",
    "Ethernet",
    "Loopback",
    "Fabric",
    "Tunnel",
    "Vxlan",
    "Vlan",
    "Dps",
];

/// Abbreviation to canonical type name. Longer abbreviations come first.
pub const INTERFACE_ALIASES: [(&str, &str); 6] = [
    ("eth", "Ethernet"),
    ("et", "Ethernet"),
    ("po", "Port-Channel"),
    ("lo", "Loopback"),
    ("vl", "Vlan"),
    ("ma", "Management"),
];

/// Shape of a canonical interface name.
pub const INTERFACE_PATTERN: &str =
    r"^(Dps|Ethernet|Fabric|Loopback|Management|Port-Channel|Tunnel|Vlan|Vxlan)\d+(/\d+)*(\.\d+)?$";

/// Interface prefixes excluded from MTU checks unless configured otherwise.
pub const DEFAULT_IGNORED_INTERFACES: [&str; 4] = ["Management", "Loopback", "Vxlan", "Tunnel"];

/// Default expected layer 3 MTU.
pub const DEFAULT_L3_MTU: u32 = 1500;

/// Default expected layer 2 MTU.
pub const DEFAULT_L2_MTU: u32 = 9214;

/// Virtual platforms without hardware counters for storm control and
/// port-channel membership.
pub const VIRTUAL_PLATFORMS: [&str; 2] = ["cEOSLab", "vEOS-lab"];

/// Utilization percentage above which an interface is reported.
pub const UTILIZATION_THRESHOLD: f64 = 75.0;

/// Canonical type name for a lowercase abbreviation or full name.
pub fn canonical_type(token: &str) -> Option<&'static str> {
    INTERFACE_TYPES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(token))
        .or_else(|| {
            INTERFACE_ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(token))
                .map(|(_, full)| *full)
        })
}
