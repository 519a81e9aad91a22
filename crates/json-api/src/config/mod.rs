//! Server configuration module

use clap::Parser;

use scoops_app::context::AppSettings;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Scoops JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "scoops-json", about = "Scoops JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Bearer token settings.
    #[command(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings the application context is assembled from.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            max_connections: self.database.max_connections,
            transaction_timeout: self.database.transaction_timeout(),
            token_secret: self.auth.token_secret.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn defaults_apply_when_only_required_values_are_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "scoops-json",
            "--database-url",
            "postgres://localhost/scoops",
            "--token-secret",
            SECRET,
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);

        let settings = config.app_settings();

        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.transaction_timeout, Duration::from_secs(5));
        assert_eq!(settings.token_secret, SECRET);

        Ok(())
    }

    #[test]
    fn missing_token_secret_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "scoops-json",
            "--database-url",
            "postgres://localhost/scoops",
        ]);

        assert!(result.is_err(), "token secret should be required");
    }
}
