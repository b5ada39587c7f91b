//! Translate legacy references into target ids.

use crate::error::{MigrateError, Result};
use crate::ipam::Inventory;
use crate::models::{IpamId, Ipv4};

/// Target id of the VLAN with this legacy number.
pub async fn vlan_id_for_number<I: Inventory>(inventory: &I, number: u32) -> Result<IpamId> {
    let id = inventory
        .vlan_by_number(number)
        .await?
        .and_then(|vlan| vlan.id)
        .ok_or(MigrateError::VlanNotFound { number })?;
    log::debug!("VLAN number {number} is VLAN ID {id}");
    Ok(id)
}

/// Target id of the subnet registered at exactly `cidr`.
pub async fn subnet_id_for_cidr<I: Inventory>(inventory: &I, cidr: &Ipv4) -> Result<IpamId> {
    let id = inventory
        .subnet_by_cidr(cidr)
        .await?
        .and_then(|subnet| subnet.id)
        .ok_or_else(|| MigrateError::SubnetNotFound {
            cidr: cidr.to_string(),
        })?;
    log::debug!("Subnet {cidr} is subnet ID {id}");
    Ok(id)
}
