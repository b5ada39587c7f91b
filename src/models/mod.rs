//! Domain models for the migrator.
//!
//! - [`Ipv4`] - IPv4 block with CIDR notation support, and the legacy
//!   decimal address codec
//! - [`Vlan`], [`Subnet`], [`Address`] - records in phpIPAM's shape

mod address;
pub(crate) mod ipam_serde;
mod ipv4;
mod subnet;
mod vlan;

/// Identifier phpIPAM assigns to a created object.
pub type IpamId = u32;

// Re-export public types
pub use address::Address;
pub use ipv4::{
    broadcast_addr, cut_addr, decode_decimal, encode_decimal, get_cidr_mask, parse_mask, Ipv4,
    MAX_LENGTH,
};
pub use subnet::Subnet;
pub use vlan::Vlan;
