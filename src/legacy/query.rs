//! Queries against the legacy (0.8 era) phpIPAM schema.
//!
//! Rows come back from `mysql --batch --skip-column-names`: one line per
//! row, tab separated, `NULL` for SQL null, and `\t` `\n` `\\` `\0`
//! escaped inside values.

use super::cli;
use crate::config::LegacyDbArgs;
use crate::error::{MigrateError, Result};
use serde::{Deserialize, Serialize};

/// VLANs by name, number and description.
pub const VLAN_QUERY: &str = "select name, number, description from vlans";

/// Subnets, joined to VLANs so the VLAN is known by number rather than by
/// its legacy id.
pub const SUBNET_QUERY: &str = "select subnets.subnet, subnets.mask, subnets.description, vlans.number from subnets left join vlans on subnets.vlanId = vlans.vlanId";

/// Addresses, joined to subnets so the owning subnet is known by its
/// address and mask rather than by its legacy id.
pub const ADDRESS_QUERY: &str = "select ipaddresses.ip_addr, ipaddresses.description, ipaddresses.dns_name, ipaddresses.note, subnets.subnet, subnets.mask from ipaddresses left join subnets on ipaddresses.subnetId = subnets.id";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct VlanRow {
    pub name: Option<String>,
    pub number: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SubnetRow {
    /// Decimal encoded network address.
    pub subnet: Option<String>,
    pub mask: Option<String>,
    pub description: Option<String>,
    pub vlan_number: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressRow {
    /// Decimal encoded address.
    pub ip_addr: Option<String>,
    pub description: Option<String>,
    pub dns_name: Option<String>,
    pub note: Option<String>,
    /// Decimal encoded address of the owning subnet.
    pub subnet: Option<String>,
    pub subnet_mask: Option<String>,
}

type Row = Vec<Option<String>>;

pub fn fetch_vlans(db: &LegacyDbArgs) -> Result<Vec<VlanRow>> {
    log::info!("Fetching VLANs from legacy DB");
    let rows = query(db, VLAN_QUERY, 3)?
        .into_iter()
        .map(|mut r| VlanRow {
            description: r.pop().flatten(),
            number: r.pop().flatten(),
            name: r.pop().flatten(),
        })
        .collect::<Vec<_>>();
    log::info!("Found {} VLAN rows", rows.len());
    Ok(rows)
}

pub fn fetch_subnets(db: &LegacyDbArgs) -> Result<Vec<SubnetRow>> {
    log::info!("Fetching subnets from legacy DB");
    let rows = query(db, SUBNET_QUERY, 4)?
        .into_iter()
        .map(|mut r| SubnetRow {
            vlan_number: r.pop().flatten(),
            description: r.pop().flatten(),
            mask: r.pop().flatten(),
            subnet: r.pop().flatten(),
        })
        .collect::<Vec<_>>();
    log::info!("Found {} subnet rows", rows.len());
    Ok(rows)
}

pub fn fetch_addresses(db: &LegacyDbArgs) -> Result<Vec<AddressRow>> {
    log::info!("Fetching addresses from legacy DB");
    let rows = query(db, ADDRESS_QUERY, 6)?
        .into_iter()
        .map(|mut r| AddressRow {
            subnet_mask: r.pop().flatten(),
            subnet: r.pop().flatten(),
            note: r.pop().flatten(),
            dns_name: r.pop().flatten(),
            description: r.pop().flatten(),
            ip_addr: r.pop().flatten(),
        })
        .collect::<Vec<_>>();
    log::info!("Found {} address rows", rows.len());
    Ok(rows)
}

/// Run one query through the mysql client and split its rows.
fn query(db: &LegacyDbArgs, sql: &str, columns: usize) -> Result<Vec<Row>> {
    log::debug!("Running SQL query: {sql}");
    let cmd = mysql_command(db, sql);
    let output = cli::run(&cmd, &[("MYSQL_PWD", db.password.as_str())])?;
    parse_batch(&output, columns)
}

/// The client command line. The password travels in `MYSQL_PWD`, not here.
fn mysql_command(db: &LegacyDbArgs, sql: &str) -> String {
    let mut cmd = String::from("mysql --batch --skip-column-names");
    if !db.host.is_empty() {
        // TCP only, on the default port
        cmd.push_str(&format!(" --protocol=TCP -h {} -P 3306", db.host));
    }
    cmd.push_str(&format!(" -u {} {} -e '{sql}'", db.user, db.name));
    cmd
}

/// Split batch output into rows of exactly `columns` values.
pub fn parse_batch(output: &str, columns: usize) -> Result<Vec<Row>> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            let row: Row = line.split('\t').map(parse_field).collect();
            if row.len() != columns {
                return Err(MigrateError::Command(format!(
                    "row {i} has {} columns, expected {columns}: {line:?}",
                    row.len()
                )));
            }
            Ok(row)
        })
        .collect()
}

fn parse_field(raw: &str) -> Option<String> {
    if raw == "NULL" {
        return None;
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch() {
        let output = "servers\t100\tServer VLAN\nvoice\t200\tNULL\n";
        let rows = parse_batch(output, 3).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].as_deref(), Some("servers"));
        assert_eq!(rows[0][2].as_deref(), Some("Server VLAN"));
        assert_eq!(rows[1][2], None);
    }

    #[test]
    fn test_parse_batch_escapes() {
        let output = "a\\tb\tline1\\nline2\tC:\\\\temp\n";
        let rows = parse_batch(output, 3).unwrap();
        assert_eq!(rows[0][0].as_deref(), Some("a\tb"));
        assert_eq!(rows[0][1].as_deref(), Some("line1\nline2"));
        assert_eq!(rows[0][2].as_deref(), Some("C:\\temp"));
    }

    #[test]
    fn test_parse_batch_column_mismatch() {
        let err = parse_batch("only\ttwo\n", 3).unwrap_err();
        assert!(matches!(err, MigrateError::Command(_)));
    }

    #[test]
    fn test_parse_batch_empty_string_is_not_null() {
        let rows = parse_batch("\t100\t\n", 3).unwrap();
        // A leading empty name still produces a row, the line is not blank.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].as_deref(), Some(""));
        assert_eq!(rows[0][2].as_deref(), Some(""));
    }

    #[test]
    fn test_mysql_command() {
        let mut db = LegacyDbArgs {
            host: String::new(),
            user: "phpipam".into(),
            password: "secret".into(),
            name: "legacy".into(),
        };
        let cmd = mysql_command(&db, VLAN_QUERY);
        assert_eq!(
            cmd,
            "mysql --batch --skip-column-names -u phpipam legacy -e 'select name, number, description from vlans'"
        );
        assert!(!cmd.contains("secret"));

        db.host = "db.example.com".into();
        assert!(mysql_command(&db, VLAN_QUERY).contains("--protocol=TCP -h db.example.com -P 3306"));
    }
}
