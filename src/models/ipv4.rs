//! IPv4 address and CIDR notation utilities.
//!
//! Provides the [`Ipv4`] CIDR block used for every subnet the migrator
//! handles, plus [`decode_decimal`] for the legacy database's integer
//! encoded addresses.

use crate::error::{MigrateError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Decode a legacy decimal address (e.g. `"168427520"`) to dotted quad.
///
/// Anything that is not an unsigned 32-bit decimal fails with
/// [`MigrateError::InvalidAddressFormat`]. The legacy store keeps IPv6
/// addresses in the same column, those land here too and are skipped by
/// the caller.
///
/// # Examples
/// ```
/// use phpipam_legacy_migrator::models::decode_decimal;
/// assert_eq!(decode_decimal("168427520").unwrap().to_string(), "10.10.0.0");
/// assert!(decode_decimal("4294967296").is_err());
/// ```
pub fn decode_decimal(raw: &str) -> Result<Ipv4Addr> {
    let invalid = || MigrateError::InvalidAddressFormat {
        value: raw.to_string(),
    };
    // u32::from_str also takes a leading '+'
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let bits = u32::from_str(raw).map_err(|_| invalid())?;
    Ok(Ipv4Addr::from(bits))
}

/// Inverse of [`decode_decimal`].
pub fn encode_decimal(addr: Ipv4Addr) -> String {
    u32::from(addr).to_string()
}

/// Parse a legacy mask column, rejecting anything outside `0..=32`.
pub fn parse_mask(raw: &str) -> Result<u8> {
    match u8::from_str(raw.trim()) {
        Ok(mask) if mask <= MAX_LENGTH => Ok(mask),
        _ => Err(MigrateError::InvalidMask {
            mask: raw.to_string(),
        }),
    }
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use phpipam_legacy_migrator::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(MigrateError::InvalidMask {
            mask: len.to_string(),
        })
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from((u32::from(addr) & mask) | !mask))
}

/// IPv4 address with CIDR notation support.
///
/// Ordering is numeric on the address, then on the mask. For blocks that
/// are either nested or disjoint this puts every block ahead of the
/// blocks it contains.
#[derive(Eq, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) =
            addr_cidr
                .split_once('/')
                .ok_or_else(|| MigrateError::InvalidAddressFormat {
                    value: addr_cidr.to_string(),
                })?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| MigrateError::InvalidAddressFormat {
            value: addr.to_string(),
        })?;
        let mask = parse_mask(mask)?;
        Ok(Ipv4 { addr, mask })
    }

    /// Build a block from parts, validating the mask.
    pub fn from_parts(addr: Ipv4Addr, mask: u8) -> Result<Ipv4> {
        get_cidr_mask(mask)?;
        Ok(Ipv4 { addr, mask })
    }

    /// The block of width `len` that contains this address, with its
    /// network address recomputed (`10.10.2.0/24` at 16 is `10.10.0.0/16`).
    pub fn supernet(&self, len: u8) -> Result<Ipv4> {
        Ok(Ipv4 {
            addr: cut_addr(self.addr, len)?,
            mask: len,
        })
    }

    /// True when `other` lies entirely inside this block.
    pub fn contains(&self, other: &Ipv4) -> bool {
        other.mask >= self.mask && self.lo() <= other.lo() && other.hi() <= self.hi()
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask.min(MAX_LENGTH)).unwrap_or(self.addr)
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        cut_addr(self.addr, self.mask.min(MAX_LENGTH)).unwrap_or(self.addr)
    }
}

impl FromStr for Ipv4 {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        Ipv4::new(s)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Ipv4 {
    fn eq(&self, other: &Ipv4) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

impl PartialOrd for Ipv4 {
    fn partial_cmp(&self, other: &Ipv4) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_decimal() {
        assert_eq!(decode_decimal("0").unwrap(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(
            decode_decimal("167772160").unwrap(),
            Ipv4Addr::new(10, 0, 0, 0)
        );
        assert_eq!(
            decode_decimal("2886729728").unwrap(),
            Ipv4Addr::new(172, 16, 0, 0)
        );
        assert_eq!(
            decode_decimal("4294967295").unwrap(),
            Ipv4Addr::new(255, 255, 255, 255)
        );
    }

    #[test]
    fn test_decode_decimal_round_trips() {
        for raw in ["1", "167772160", "168431104", "3232235777", "4294967295"] {
            let addr = decode_decimal(raw).unwrap();
            assert_eq!(encode_decimal(addr), raw);
        }
    }

    #[test]
    fn test_decode_decimal_rejects_out_of_range() {
        // one past u32::MAX and a typical IPv6 value from the legacy column
        for raw in [
            "4294967296",
            "42540766411282592856903984951653826560",
            "-1",
            "",
            "10.0.0.1",
            " 167772160",
            "+1",
            "+167772160",
        ] {
            let err = decode_decimal(raw).unwrap_err();
            assert!(
                matches!(err, MigrateError::InvalidAddressFormat { .. }),
                "{raw:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_parse_mask() {
        assert_eq!(parse_mask("0").unwrap(), 0);
        assert_eq!(parse_mask("24").unwrap(), 24);
        assert_eq!(parse_mask("32").unwrap(), 32);
        assert!(parse_mask("33").is_err());
        assert!(parse_mask("NULL").is_err());
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_cut_addr() {
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        assert_eq!(cut_addr(ip, 24).unwrap(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(cut_addr(ip, 16).unwrap(), Ipv4Addr::new(192, 168, 0, 0));
        assert_eq!(cut_addr(ip, 8).unwrap(), Ipv4Addr::new(192, 0, 0, 0));
        assert_eq!(cut_addr(ip, 32).unwrap(), Ipv4Addr::new(192, 168, 1, 42));
        assert!(cut_addr(ip, 33).is_err());
    }

    #[test]
    fn test_broadcast_addr() {
        let ip = Ipv4Addr::new(192, 168, 1, 0);
        assert_eq!(
            broadcast_addr(ip, 24).unwrap(),
            Ipv4Addr::new(192, 168, 1, 255)
        );
        assert_eq!(
            broadcast_addr(ip, 8).unwrap(),
            Ipv4Addr::new(192, 255, 255, 255)
        );
        assert_eq!(
            broadcast_addr(ip, 32).unwrap(),
            Ipv4Addr::new(192, 168, 1, 0)
        );
    }

    #[test]
    fn test_supernet() {
        let net = Ipv4::new("10.10.2.0/24").unwrap();
        assert_eq!(net.supernet(23).unwrap(), Ipv4::new("10.10.2.0/23").unwrap());
        assert_eq!(net.supernet(22).unwrap(), Ipv4::new("10.10.0.0/22").unwrap());
        assert_eq!(net.supernet(16).unwrap(), Ipv4::new("10.10.0.0/16").unwrap());
        assert_eq!(net.supernet(8).unwrap(), Ipv4::new("10.0.0.0/8").unwrap());
        assert!(net.supernet(40).is_err());
    }

    #[test]
    fn test_contains() {
        let wide = Ipv4::new("10.0.0.0/8").unwrap();
        let mid = Ipv4::new("10.10.0.0/16").unwrap();
        let leaf = Ipv4::new("10.10.2.0/24").unwrap();
        let other = Ipv4::new("172.16.0.0/12").unwrap();

        assert!(wide.contains(&mid));
        assert!(wide.contains(&leaf));
        assert!(mid.contains(&leaf));
        assert!(wide.contains(&wide));
        assert!(!leaf.contains(&mid));
        assert!(!wide.contains(&other));
    }

    #[test]
    fn test_ip4_cmp_overlap() {
        let ip1 = Ipv4::new("10.0.10.0/24").unwrap();
        let ip2 = Ipv4::new("10.0.0.0/8").unwrap();
        let ip3 = Ipv4::new("10.0.10.64/26").unwrap();

        assert!(ip1 > ip2);
        assert!(ip1 < ip3);
        assert!(ip2 < ip3);
        assert!(ip2.lo() < ip1.lo());
        assert!(ip2.hi() > ip3.hi());
        assert_eq!(ip2.hi(), Ipv4Addr::new(10, 255, 255, 255));

        // same network address, wider block first
        let a = Ipv4::new("10.10.0.0/16").unwrap();
        let b = Ipv4::new("10.10.0.0/24").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_as_cidr_string() {
        let net = Ipv4::new("172.16.0.0/12").unwrap();
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, "\"172.16.0.0/12\"");
        let back: Ipv4 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, net);
        assert!(serde_json::from_str::<Ipv4>("\"10.0.0.0\"").is_err());
        assert!(serde_json::from_str::<Ipv4>("\"10.0.0.0/40\"").is_err());
    }
}
