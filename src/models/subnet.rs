//! Subnet record as phpIPAM stores it.

use super::{ipam_serde, IpamId, Ipv4};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A subnet. Nesting is expressed through `master_subnet_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    /// phpIPAM subnet id, unset until created.
    #[serde(
        default,
        with = "ipam_serde::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<IpamId>,
    /// Network address in dotted quad.
    #[serde(rename = "subnet")]
    pub address: Ipv4Addr,
    /// Prefix length (0-32).
    #[serde(with = "ipam_serde::string_int")]
    pub mask: u8,
    #[serde(default, deserialize_with = "ipam_serde::null_as_empty")]
    pub description: String,
    /// Section the subnet is filed under (required on create).
    #[serde(rename = "sectionId", with = "ipam_serde::string_int")]
    pub section_id: u32,
    /// Target VLAN id, resolved from `vlan_number` before create.
    #[serde(
        rename = "vlanId",
        default,
        with = "ipam_serde::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub vlan_id: Option<IpamId>,
    /// Parent subnet id when nested.
    #[serde(
        rename = "masterSubnetId",
        default,
        with = "ipam_serde::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub master_subnet_id: Option<IpamId>,
    /// VLAN number carried over from the legacy row, never sent.
    #[serde(skip)]
    pub vlan_number: Option<u32>,
}

impl Subnet {
    pub fn new(address: Ipv4Addr, mask: u8, description: impl Into<String>, section_id: u32) -> Self {
        Self {
            id: None,
            address,
            mask,
            description: description.into(),
            section_id,
            vlan_id: None,
            master_subnet_id: None,
            vlan_number: None,
        }
    }

    /// The block this subnet covers.
    pub fn cidr(&self) -> Ipv4 {
        Ipv4 {
            addr: self.address,
            mask: self.mask,
        }
    }

    /// `"<address>/<mask>"` as text, the key for lexicographic ordering.
    pub fn cidr_string(&self) -> String {
        format!("{}/{}", self.address, self.mask)
    }
}
