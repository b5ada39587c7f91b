//! The capabilities the migration needs from the target inventory.

use crate::error::Result;
use async_trait::async_trait;
use crate::models::{Address, IpamId, Ipv4, Subnet, Vlan};

/// Target system seen by the pipeline.
///
/// Lookups return `Ok(None)` when the object does not exist. Any `Err` is
/// a real failure and ends the run. Calls are made one at a time, the
/// futures need not be `Send`.
#[async_trait(?Send)]
pub trait Inventory {
    async fn create_vlan(&self, vlan: &Vlan) -> Result<IpamId>;

    async fn create_subnet(&self, subnet: &Subnet) -> Result<IpamId>;

    async fn create_address(&self, address: &Address) -> Result<IpamId>;

    /// Exact match on network address and mask.
    async fn subnet_by_cidr(&self, cidr: &Ipv4) -> Result<Option<Subnet>>;

    async fn vlan_by_number(&self, number: u32) -> Result<Option<Vlan>>;
}
