//! Database Config

use std::time::Duration;

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Upper bound on pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10_u32)]
    pub max_connections: u32,

    /// Time allowed for a checkout transaction, in milliseconds
    #[arg(long, env = "TRANSACTION_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub transaction_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }
}
