//! Store configuration loaded via OrthoConfig.
//!
//! Values come from `ACCOUNTS_DB_*` environment variables (and any
//! configuration file OrthoConfig discovers), falling back to the pool
//! defaults below. A `--database-url` flag beats every other source.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoResult};
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Connection settings for the PostgreSQL stores.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS_DB")]
pub struct StoreSettings {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 10)]
    pub max_connections: u32,
    /// Connections kept idle; `0` disables the floor.
    #[ortho_config(default = 2)]
    pub min_idle: u32,
    /// Seconds to wait for a pooled connection.
    #[ortho_config(default = 30)]
    pub connect_timeout_secs: u64,
}

impl StoreSettings {
    /// Load settings for `program`, passing `database_url` to OrthoConfig as
    /// `--database-url` when given.
    ///
    /// # Errors
    ///
    /// Returns the OrthoConfig error when no source provides a URL or when a
    /// configured value does not parse, even if the URL came from the flag.
    pub fn load_with_database_url(program: &str, database_url: Option<&str>) -> OrthoResult<Self> {
        let mut args = vec![OsString::from(program)];
        if let Some(url) = database_url {
            args.push(OsString::from("--database-url"));
            args.push(OsString::from(url));
        }
        Self::load_from_iter(args)
    }

    /// Pool configuration derived from these settings.
    pub fn pool_config(&self) -> PoolConfig {
        let min_idle = (self.min_idle > 0).then_some(self.min_idle);
        PoolConfig::new(self.database_url.as_str())
            .with_max_size(self.max_connections)
            .with_min_idle(min_idle)
            .with_connection_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}
