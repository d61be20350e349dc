//! Interface speed specifications.
//!
//! A speed spec is the compact notation used in declared inputs:
//!
//! ```text
//! spec := [ ("auto" | "force" | "forced") SP ] NUMBER ["g"] ["-" LANES]
//!       | "auto"
//! ```
//!
//! Speeds are held as bits per second so that the expected value (from the
//! spec) and the actual value (from device `bandwidth`) render through the
//! same [`Gbps`] display and compare exactly.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

const BITS_PER_GBIT: u64 = 1_000_000_000;

/// Accepted shape of a speed string in declared inputs. Case-insensitive,
/// with at most four speed digits, one fractional digit and two lane digits.
pub const SPEED_PATTERN: &str =
    r"(?i)^\s*(?:auto|(?:(?:auto|forced?)\s*)?\d{1,4}(?:\.\d)?g?(?:-\d{1,2})?)\s*$";

static SPEED_INPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(SPEED_PATTERN).expect("speed input pattern is valid"));

static SPEED_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(auto|forced?)\s*)?(\d+)(?:\.(\d+))?(?:g)?(?:-(\d+))?$")
        .expect("speed spec pattern is valid")
});

/// Negotiation mode declared by a speed spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedMode {
    /// Auto-negotiation expected to succeed
    Auto,
    /// Speed pinned, no negotiation expected
    Forced,
    /// Nothing usable could be parsed
    None,
}

impl fmt::Display for SpeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedMode::Auto => write!(f, "auto"),
            SpeedMode::Forced => write!(f, "forced"),
            SpeedMode::None => write!(f, "none"),
        }
    }
}

/// A link speed in bits per second, displayed in Gbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gbps(u64);

impl Gbps {
    /// Wrap a raw bits-per-second value.
    pub fn from_bps(bps: u64) -> Self {
        Gbps(bps)
    }

    /// Raw bits-per-second value.
    pub fn bps(&self) -> u64 {
        self.0
    }

    /// Parse a decimal Gbps figure such as `10`, `2.5` or `10.3125`.
    ///
    /// At most nine fractional digits are representable in whole bits.
    pub fn parse(whole: &str, fraction: Option<&str>) -> Option<Self> {
        let whole: u64 = whole.parse().ok()?;
        let mut bps = whole.checked_mul(BITS_PER_GBIT)?;

        if let Some(fraction) = fraction {
            if fraction.is_empty() || fraction.len() > 9 {
                return None;
            }
            let digits: u64 = fraction.parse().ok()?;
            let scale = 10u64.pow(9 - fraction.len() as u32);
            bps = bps.checked_add(digits * scale)?;
        }

        Some(Gbps(bps))
    }
}

impl fmt::Display for Gbps {
    /// Integer when the quotient is exact, otherwise the full decimal
    /// expansion with trailing zeros trimmed. Division by 10^9 always has a
    /// finite expansion, so nothing is rounded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BITS_PER_GBIT;
        let rest = self.0 % BITS_PER_GBIT;
        if rest == 0 {
            write!(f, "{}", whole)
        } else {
            let fraction = format!("{:09}", rest);
            write!(f, "{}.{}", whole, fraction.trim_end_matches('0'))
        }
    }
}

/// Normalized form of a speed declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeedSpec {
    pub mode: SpeedMode,
    pub speed: Option<Gbps>,
    pub lanes: Option<u32>,
}

impl SpeedSpec {
    /// The spec produced when the text does not follow the grammar.
    pub const UNPARSED: SpeedSpec = SpeedSpec {
        mode: SpeedMode::None,
        speed: None,
        lanes: None,
    };

    /// Whether auto-negotiation is asserted.
    pub fn negotiates(&self) -> bool {
        self.mode == SpeedMode::Auto
    }

    /// Whether a numeric speed should be compared. Plain `auto` asserts no
    /// speed; an unparsed spec still compares so the mismatch is visible.
    pub fn asserts_speed(&self) -> bool {
        !(self.mode == SpeedMode::Auto && self.speed.is_none())
    }
}

impl fmt::Display for SpeedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(speed) = self.speed else {
            return write!(f, "{}", self.mode);
        };
        if self.mode == SpeedMode::Auto {
            write!(f, "auto ")?;
        }
        write!(f, "{}g", speed)?;
        if let Some(lanes) = self.lanes {
            write!(f, "-{}", lanes)?;
        }
        Ok(())
    }
}

/// Parse a speed specification.
///
/// Never fails: text outside the grammar yields [`SpeedSpec::UNPARSED`],
/// which callers treat as "no speed or lanes asserted".
pub fn parse(text: &str) -> SpeedSpec {
    let text = text.trim();

    if text.eq_ignore_ascii_case("auto") {
        return SpeedSpec {
            mode: SpeedMode::Auto,
            speed: None,
            lanes: None,
        };
    }

    let Some(caps) = SPEED_SPEC.captures(text) else {
        return SpeedSpec::UNPARSED;
    };

    let mode = match caps.get(1) {
        Some(token) if token.as_str().eq_ignore_ascii_case("auto") => SpeedMode::Auto,
        _ => SpeedMode::Forced,
    };

    let Some(speed) = Gbps::parse(&caps[2], caps.get(3).map(|m| m.as_str())) else {
        return SpeedSpec::UNPARSED;
    };

    let lanes = match caps.get(4) {
        Some(lanes) => match lanes.as_str().parse::<u32>() {
            Ok(lanes) => Some(lanes),
            Err(_) => return SpeedSpec::UNPARSED,
        },
        None => None,
    };

    SpeedSpec {
        mode,
        speed: Some(speed),
        lanes,
    }
}

/// Render a raw bits-per-second counter as Gbps text.
pub fn bps_to_gbps(bps: u64) -> String {
    Gbps::from_bps(bps).to_string()
}

/// Whether a declared speed string is acceptable at the input boundary.
pub fn is_valid_input(text: &str) -> bool {
    SPEED_INPUT.is_match(text) && parse(text) != SpeedSpec::UNPARSED
}
