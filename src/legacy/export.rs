//! Legacy rows as one batch, read from the database or an export file.
//!
//! Also decodes those rows into target records. A row that cannot be
//! decoded is dropped with a debug line and counted, the run goes on.

use super::query::{self, AddressRow, SubnetRow, VlanRow};
use crate::config::LegacyDbArgs;
use crate::error::{MigrateError, Result};
use crate::models::{decode_decimal, parse_mask, Address, Ipv4, Subnet, Vlan};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw rows of the three legacy tables.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct LegacyExport {
    pub vlans: Vec<VlanRow>,
    pub subnets: Vec<SubnetRow>,
    pub addresses: Vec<AddressRow>,
}

/// Decoded records ready for the pipeline.
#[derive(Debug, Default, Clone)]
pub struct LegacyRecords {
    pub vlans: Vec<Vlan>,
    pub subnets: Vec<Subnet>,
    pub addresses: Vec<Address>,
    /// Rows dropped because they could not be decoded.
    pub skipped: usize,
}

/// Read the legacy rows from `export_file` when given, otherwise query
/// the database.
///
/// # Returns
/// * `Ok(LegacyExport)` - Rows from the file or the database
/// * `Err` - If the export file does not exist or the queries fail
pub fn read_legacy_export(export_file: Option<&str>, db: &LegacyDbArgs) -> Result<LegacyExport> {
    match export_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(MigrateError::Export(format!(
                    "export file does not exist: {file}"
                )));
            }
            log::info!("Using provided export file: {file}");
            LegacyExport::load(file)
        }
        None => {
            log::debug!("Connecting to DB: {}", db.redacted_dsn());
            LegacyExport::fetch(db)
        }
    }
}

impl LegacyExport {
    /// Run the three legacy queries.
    pub fn fetch(db: &LegacyDbArgs) -> Result<Self> {
        Ok(Self {
            vlans: query::fetch_vlans(db)?,
            subnets: query::fetch_subnets(db)?,
            addresses: query::fetch_addresses(db)?,
        })
    }

    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| MigrateError::Export(format!("error reading {path}: {e}")))?;
        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let export: LegacyExport = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| {
                MigrateError::Export(format!(
                    "error parsing {path}: path={} error={}",
                    e.path(),
                    e.inner()
                ))
            })?;
        log::info!(
            "Read {} VLAN, {} subnet and {} address rows from {path}",
            export.vlans.len(),
            export.subnets.len(),
            export.addresses.len()
        );
        Ok(export)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MigrateError::Export(format!("error serializing export: {e}")))?;
        log::warn!("Writing legacy rows to export file: {path}");
        std::fs::write(path, json)
            .map_err(|e| MigrateError::Export(format!("error writing {path}: {e}")))?;
        Ok(())
    }

    /// Decode every row, dropping the ones that do not decode.
    pub fn into_records(self, section_id: u32) -> Result<LegacyRecords> {
        let mut records = LegacyRecords::default();

        for row in self.vlans {
            if let Some(vlan) = keep(decode_vlan(&row), &mut records.skipped, "VLAN")? {
                log::debug!(
                    "Found VLAN - Name: {}, Number: {}, Description: {}",
                    vlan.name,
                    vlan.number,
                    vlan.description
                );
                records.vlans.push(vlan);
            }
        }
        log::info!("Found {} VLANs to migrate", records.vlans.len());

        for row in self.subnets {
            if let Some(subnet) =
                keep(decode_subnet(&row, section_id), &mut records.skipped, "subnet")?
            {
                log::debug!(
                    "Found subnet - Name: {}, Mask: {}, Description: {}, VLAN: {:?}",
                    subnet.address,
                    subnet.mask,
                    subnet.description,
                    subnet.vlan_number
                );
                records.subnets.push(subnet);
            }
        }
        log::info!("Found {} subnets to migrate", records.subnets.len());

        for row in self.addresses {
            if let Some(address) = keep(decode_address(&row), &mut records.skipped, "address")? {
                log::debug!(
                    "Found IP address - Address: {}, Hostname: {}, Subnet: {:?}",
                    address.ip,
                    address.hostname,
                    address.subnet
                );
                records.addresses.push(address);
            }
        }
        log::info!("Found {} addresses to migrate", records.addresses.len());

        Ok(records)
    }
}

/// Turn a skip error into `None`, pass anything else up.
fn keep<T>(decoded: Result<T>, skipped: &mut usize, kind: &str) -> Result<Option<T>> {
    match decoded {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_skip() => {
            log::debug!("Ignoring {kind} row, possibly not an IPv4 address ({e})");
            *skipped += 1;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn text(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

/// `NULL` or `0` is "no VLAN".
fn vlan_number(field: &Option<String>) -> Result<Option<u32>> {
    match field.as_deref().map(str::trim) {
        None | Some("") | Some("0") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| MigrateError::InvalidField {
            field: "VLAN number",
            value: raw.to_string(),
        }),
    }
}

fn required<'a>(field: &'a Option<String>, what: &'static str) -> Result<&'a str> {
    field.as_deref().ok_or(MigrateError::InvalidField {
        field: what,
        value: "NULL".to_string(),
    })
}

pub fn decode_vlan(row: &VlanRow) -> Result<Vlan> {
    let number = vlan_number(&row.number)?.ok_or_else(|| MigrateError::InvalidField {
        field: "VLAN number",
        value: text(&row.number),
    })?;
    Ok(Vlan::new(text(&row.name), number, text(&row.description)))
}

pub fn decode_subnet(row: &SubnetRow, section_id: u32) -> Result<Subnet> {
    let address = decode_decimal(required(&row.subnet, "subnet address")?)?;
    let mask = parse_mask(required(&row.mask, "mask")?)?;
    let mut subnet = Subnet::new(address, mask, text(&row.description), section_id);
    subnet.vlan_number = vlan_number(&row.vlan_number)?;
    Ok(subnet)
}

/// An address row whose subnet join came back NULL has no subnet to go
/// into, that is fatal. A subnet that fails to decode (IPv6) is a skip.
pub fn decode_address(row: &AddressRow) -> Result<Address> {
    let ip = decode_decimal(required(&row.ip_addr, "IP address")?)?;
    let (Some(subnet_addr), Some(subnet_mask)) = (&row.subnet, &row.subnet_mask) else {
        return Err(MigrateError::SubnetNotFound {
            cidr: format!("(none recorded for {ip})"),
        });
    };
    let subnet_addr = decode_decimal(subnet_addr)?;
    let subnet_mask = parse_mask(subnet_mask)?;

    let mut address = Address::new(
        ip,
        Ipv4 {
            addr: subnet_addr,
            mask: subnet_mask,
        },
    );
    address.description = text(&row.description);
    address.hostname = text(&row.dns_name);
    address.note = text(&row.note);
    Ok(address)
}
