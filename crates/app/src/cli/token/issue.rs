use std::sync::Arc;

use clap::Args;
use jiff::{SignedDuration, Timestamp};
use scoops_app::{
    auth::{AuthService, TokenAuthService, TokenSecret, TokenSigner},
    database::{self, Db},
    domain::users::{PgUsersService, records::UserId},
};

#[derive(Debug, Args)]
pub(crate) struct IssueTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Secret used to sign tokens; must match the server
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// User the token is issued for
    #[arg(long)]
    user_id: i64,

    /// Lifetime of the token in hours
    #[arg(long, default_value_t = 24)]
    ttl_hours: u32,
}

pub(crate) async fn run(args: IssueTokenArgs) -> Result<(), String> {
    let secret = TokenSecret::new(args.token_secret.as_bytes())
        .map_err(|error| format!("invalid token secret: {error}"))?;

    let signer =
        TokenSigner::new(&secret).map_err(|error| format!("invalid token secret: {error}"))?;

    let expires_at = Timestamp::now()
        .checked_add(SignedDuration::from_hours(i64::from(args.ttl_hours)))
        .map_err(|error| format!("invalid ttl-hours: {error}"))?;

    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let users = Arc::new(PgUsersService::new(Db::new(pool)));
    let service = TokenAuthService::new(signer, users);

    let token = service
        .issue_token(UserId::from_i64(args.user_id), expires_at)
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("token_expires_at: {expires_at}");
    println!("bearer_token: {token}");

    Ok(())
}
