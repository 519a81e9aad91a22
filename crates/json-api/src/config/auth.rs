//! Auth Config

use clap::Args;

/// Bearer token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Key used to sign and verify bearer tokens (at least 32 bytes)
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,
}
