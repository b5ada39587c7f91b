//! Command line and environment configuration.
//!
//! Every flag can also come from the environment (a `.env` file is loaded
//! by `main` first). Values are passed explicitly into the components that
//! need them.

use crate::error::{MigrateError, Result};
use crate::processing::OrderStrategy;
use clap::{Args, Parser};
use std::time::Duration;

/// Migrate VLANs, subnets and addresses from a legacy phpIPAM database to
/// a current phpIPAM through its API.
#[derive(Parser, Debug, Clone)]
#[command(name = "phpipam-legacy-migrator", version, about)]
pub struct Config {
    #[command(flatten)]
    pub db: LegacyDbArgs,

    #[command(flatten)]
    pub ipam: IpamArgs,

    /// The section ID to add subnets to
    #[arg(long = "sectionid", env = "PHPIPAM_SECTION_ID", default_value_t = 1)]
    pub section_id: u32,

    /// Read legacy rows from this export file instead of the database
    #[arg(long = "from-export")]
    pub from_export: Option<String>,

    /// Write the extracted legacy rows to this export file
    #[arg(long = "save-export")]
    pub save_export: Option<String>,

    /// Order in which subnets are created
    #[arg(long = "order", value_enum, default_value_t = OrderStrategy::Lexicographic)]
    pub order: OrderStrategy,

    /// Plan the subnet hierarchy locally and exit without writing
    #[arg(long = "dry-run", default_value_t = false)]
    pub dry_run: bool,

    /// Pause after every write to phpIPAM, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 0)]
    pub delay_ms: u64,

    /// Enable debug logging
    #[arg(long = "debug", default_value_t = false)]
    pub debug: bool,
}

/// Connection settings for the legacy MySQL database.
///
/// Argument ids are set explicitly, the field names clash with
/// [`IpamArgs`] once both are flattened into [`Config`].
#[derive(Args, Debug, Clone, Default)]
pub struct LegacyDbArgs {
    /// The database host to connect to (local socket when empty)
    #[arg(id = "dbhost", long = "dbhost", env = "LEGACY_DB_HOST", default_value = "")]
    pub host: String,

    /// The database user to use
    #[arg(id = "dbuser", long = "dbuser", env = "LEGACY_DB_USER", default_value = "phpipam")]
    pub user: String,

    /// The password for the database user
    #[arg(
        id = "dbpassword",
        long = "dbpassword",
        env = "LEGACY_DB_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// The name of the database to import data from
    #[arg(id = "dbname", long = "dbname", env = "LEGACY_DB_NAME", default_value = "phpipam")]
    pub name: String,
}

/// Connection settings for the target phpIPAM API.
#[derive(Args, Debug, Clone)]
pub struct IpamArgs {
    /// The phpIPAM application ID to use
    #[arg(long = "appid", env = "PHPIPAM_APP_ID", default_value = "default")]
    pub app_id: String,

    /// The phpIPAM endpoint to connect to
    #[arg(
        long = "endpoint",
        env = "PHPIPAM_ENDPOINT_ADDR",
        default_value = "http://localhost/api"
    )]
    pub endpoint: String,

    /// The user to use when connecting to phpIPAM
    #[arg(long = "user", env = "PHPIPAM_USER_NAME", default_value = "Admin")]
    pub user: String,

    /// The password for the phpIPAM user
    #[arg(long = "password", env = "PHPIPAM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Config {
    /// Check values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.section_id == 0 {
            return Err(MigrateError::Config("section id must be at least 1".into()));
        }
        reqwest::Url::parse(&self.ipam.endpoint).map_err(|e| {
            MigrateError::Config(format!("invalid endpoint {}: {e}", self.ipam.endpoint))
        })?;
        if !self.dry_run && self.ipam.password.as_deref().unwrap_or("").is_empty() {
            return Err(MigrateError::Config(
                "a phpIPAM password is required (--password or PHPIPAM_PASSWORD)".into(),
            ));
        }
        Ok(())
    }

    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl LegacyDbArgs {
    /// `user:[hidden]@host/name` for log lines.
    pub fn redacted_dsn(&self) -> String {
        let host = if self.host.is_empty() {
            "localhost"
        } else {
            &self.host
        };
        format!("{}:[hidden]@{}/{}", self.user, host, self.name)
    }
}
