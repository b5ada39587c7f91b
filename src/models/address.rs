//! IP address record as phpIPAM stores it.

use super::{ipam_serde, IpamId, Ipv4};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Address {
    #[serde(
        default,
        with = "ipam_serde::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<IpamId>,
    /// Owning subnet in the target, resolved from `subnet` before create.
    #[serde(
        rename = "subnetId",
        default,
        with = "ipam_serde::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub subnet_id: Option<IpamId>,
    pub ip: Ipv4Addr,
    #[serde(default, deserialize_with = "ipam_serde::null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "ipam_serde::null_as_empty")]
    pub hostname: String,
    #[serde(default, deserialize_with = "ipam_serde::null_as_empty")]
    pub note: String,
    /// Legacy (address, mask) of the owning subnet.
    #[serde(skip)]
    pub subnet: Option<Ipv4>,
}

impl Address {
    pub fn new(ip: Ipv4Addr, subnet: Ipv4) -> Self {
        Self {
            id: None,
            subnet_id: None,
            ip,
            description: String::new(),
            hostname: String::new(),
            note: String::new(),
            subnet: Some(subnet),
        }
    }
}
