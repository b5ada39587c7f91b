//! Error type shared by the migrator library.
//!
//! Two kinds of failure exist: a malformed legacy row is skipped
//! ([`MigrateError::is_skip`]), anything else aborts the run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigrateError>;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("invalid decimal IPv4 address format: {value:?}")]
    InvalidAddressFormat { value: String },
    #[error("invalid subnet mask: {mask:?}")]
    InvalidMask { mask: String },
    #[error("invalid {field} in legacy row: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("Error from API ({code}): {message}")]
    Api { code: u16, message: String },
    /// phpIPAM answered with its own 404 envelope.
    #[error("not found in phpIPAM: {message}")]
    NotFound { message: String },
    #[error("transport error talking to phpIPAM: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response shape at {path}: {message}")]
    Decode { path: String, message: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("VLAN number {number} not found in target")]
    VlanNotFound { number: u32 },
    #[error("subnet {cidr} not found in target")]
    SubnetNotFound { cidr: String },
    #[error("legacy database query failed: {0}")]
    Command(String),
    #[error("export file error: {0}")]
    Export(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

impl MigrateError {
    /// True for row level problems that drop a single record.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            MigrateError::InvalidAddressFormat { .. }
                | MigrateError::InvalidMask { .. }
                | MigrateError::InvalidField { .. }
        )
    }
}
