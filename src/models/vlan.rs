//! VLAN record as phpIPAM stores it.

use super::{ipam_serde, IpamId};
use serde::{Deserialize, Serialize};

/// A VLAN. The target assigns `id`, later references go through `number`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Vlan {
    /// phpIPAM's VLAN id (`vlanId`), unset until created.
    #[serde(
        rename = "vlanId",
        default,
        with = "ipam_serde::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<IpamId>,
    pub name: String,
    /// VLAN number, unique in the legacy database.
    #[serde(with = "ipam_serde::string_int")]
    pub number: u32,
    #[serde(default, deserialize_with = "ipam_serde::null_as_empty")]
    pub description: String,
}

impl Vlan {
    pub fn new(name: impl Into<String>, number: u32, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            number,
            description: description.into(),
        }
    }
}
