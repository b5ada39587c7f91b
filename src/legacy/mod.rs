//! Legacy phpIPAM database access.
//!
//! - [`cli`] - Command execution for the `mysql` client
//! - [`query`] - The three legacy queries and batch row parsing
//! - [`export`] - Export file handling and row decoding

mod cli;
mod export;
mod query;

// Re-export public types and functions
pub use cli::run;
pub use export::{
    decode_address, decode_subnet, decode_vlan, read_legacy_export, LegacyExport, LegacyRecords,
};
pub use query::{parse_batch, AddressRow, SubnetRow, VlanRow};
