//! The migration run: VLANs, then subnets, then addresses.
//!
//! Each phase finishes before the next one starts. The first error ends
//! the run, records already created stay in the target.

use crate::error::{MigrateError, Result};
use crate::ipam::Inventory;
use crate::legacy::LegacyRecords;
use crate::models::{Address, Subnet, Vlan};
use crate::processing::{
    duplicate_cidrs, order_hazards, order_subnets, subnet_id_for_cidr, vlan_id_for_number,
    OrderStrategy, ParentResolver,
};

/// Counts of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub vlans_created: usize,
    pub subnets_created: usize,
    /// Subnets created under a master subnet.
    pub subnets_with_parent: usize,
    pub addresses_created: usize,
    /// Legacy rows dropped before the run.
    pub rows_skipped: usize,
}

pub struct MigrationPipeline<'a, I: Inventory> {
    inventory: &'a I,
    strategy: OrderStrategy,
}

impl<'a, I: Inventory> MigrationPipeline<'a, I> {
    pub fn new(inventory: &'a I, strategy: OrderStrategy) -> Self {
        Self {
            inventory,
            strategy,
        }
    }

    /// Run the three phases over `records`.
    pub async fn run(&self, records: LegacyRecords) -> Result<MigrationReport> {
        let mut report = MigrationReport {
            rows_skipped: records.skipped,
            ..Default::default()
        };

        report.vlans_created = self.migrate_vlans(&records.vlans).await?;
        let (created, with_parent) = self.migrate_subnets(records.subnets).await?;
        report.subnets_created = created;
        report.subnets_with_parent = with_parent;
        report.addresses_created = self.migrate_addresses(records.addresses).await?;

        log::info!("Migration finished: {report:?}");
        Ok(report)
    }

    pub async fn migrate_vlans(&self, vlans: &[Vlan]) -> Result<usize> {
        log::info!("Creating {} VLANs", vlans.len());
        for vlan in vlans {
            let id = self.inventory.create_vlan(vlan).await?;
            log::info!(
                "Created VLAN - Name: {}, Number: {}, ID: {id}",
                vlan.name,
                vlan.number
            );
        }
        Ok(vlans.len())
    }

    /// Create subnets in creation order, each under the narrowest block
    /// the target already knows.
    ///
    /// # Returns
    /// * `Ok((created, with_parent))`
    pub async fn migrate_subnets(&self, subnets: Vec<Subnet>) -> Result<(usize, usize)> {
        let ordered = order_subnets(subnets, self.strategy);
        warn_about_batch(&ordered);
        log::info!("Creating {} subnets ({:?} order)", ordered.len(), self.strategy);

        let resolver = ParentResolver::new(self.inventory);
        let mut with_parent = 0;
        for mut subnet in ordered.iter().cloned() {
            if let Some(number) = subnet.vlan_number {
                subnet.vlan_id = Some(vlan_id_for_number(self.inventory, number).await?);
            }
            subnet.master_subnet_id = resolver.resolve_parent(subnet.address, subnet.mask).await?;
            if subnet.master_subnet_id.is_some() {
                with_parent += 1;
            }

            let id = self.inventory.create_subnet(&subnet).await?;
            log::info!(
                "Created subnet {} - ID: {id}, Master: {:?}, VLAN ID: {:?}",
                subnet.cidr_string(),
                subnet.master_subnet_id,
                subnet.vlan_id
            );
        }
        Ok((ordered.len(), with_parent))
    }

    /// Create addresses in the subnet recorded for them in the legacy row.
    pub async fn migrate_addresses(&self, addresses: Vec<Address>) -> Result<usize> {
        log::info!("Creating {} IP addresses", addresses.len());
        let count = addresses.len();
        for mut address in addresses {
            let cidr = address.subnet.ok_or_else(|| MigrateError::SubnetNotFound {
                cidr: format!("(none recorded for {})", address.ip),
            })?;
            address.subnet_id = Some(subnet_id_for_cidr(self.inventory, &cidr).await?);

            let id = self.inventory.create_address(&address).await?;
            log::info!(
                "Created IP address {} in {cidr} - ID: {id}, Hostname: {}",
                address.ip,
                address.hostname
            );
        }
        Ok(count)
    }
}

fn warn_about_batch(ordered: &[Subnet]) {
    for cidr in duplicate_cidrs(ordered) {
        log::warn!("Subnet {cidr} appears more than once, the target will reject the copy");
    }
    for (child, parent) in order_hazards(ordered) {
        log::warn!(
            "Subnet {} is ordered before its parent {}, it will be created without one",
            ordered[child].cidr_string(),
            ordered[parent].cidr_string()
        );
    }
}
