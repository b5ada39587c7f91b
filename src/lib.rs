//! Migrate VLANs, subnets and IP addresses from a legacy phpIPAM MySQL
//! database into a current phpIPAM through its REST API, rebuilding the
//! subnet hierarchy on the way.

pub mod config;
pub mod error;
pub mod ipam;
pub mod legacy;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod processing;

use config::Config;
use error::Result;
use ipam::{Inventory, IpamClient};
use legacy::{read_legacy_export, LegacyRecords};
use pipeline::{MigrationPipeline, MigrationReport};
use processing::{order_subnets, plan, OrderStrategy, PlanRow};

/// Read the legacy rows, save them when asked, and decode them.
pub fn load_records(config: &Config) -> Result<LegacyRecords> {
    let export = read_legacy_export(config.from_export.as_deref(), &config.db)?;
    if let Some(path) = &config.save_export {
        export.save(path)?;
    }
    let records = export.into_records(config.section_id)?;
    if records.skipped > 0 {
        log::info!("Skipped {} legacy rows that could not be decoded", records.skipped);
    }
    Ok(records)
}

/// Subnet plan for a dry run, in the order the subnets would be created.
pub fn plan_migration(records: &LegacyRecords, strategy: OrderStrategy) -> Vec<PlanRow> {
    let ordered = order_subnets(records.subnets.clone(), strategy);
    plan(&ordered)
}

/// Run the three phases against any target.
pub async fn migrate<I: Inventory>(
    inventory: &I,
    records: LegacyRecords,
    strategy: OrderStrategy,
) -> Result<MigrationReport> {
    MigrationPipeline::new(inventory, strategy)
        .run(records)
        .await
}

/// Run against the phpIPAM configured in `config`.
pub async fn migrate_to_phpipam(
    config: &Config,
    records: LegacyRecords,
) -> Result<MigrationReport> {
    let client = IpamClient::new(&config.ipam, config.write_delay())?;
    client.login().await?;
    migrate(&client, records, config.order).await
}
