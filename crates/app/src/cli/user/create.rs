use clap::Args;
use scoops_app::{
    database::{self, Db},
    domain::users::{PgUsersService, UsersService, data::NewUser, records::Role},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unique email address
    #[arg(long)]
    email: String,

    /// `admin` or `customer`
    #[arg(long, default_value = "customer")]
    role: Role,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool));

    let user = service
        .create_user(NewUser {
            name: args.name,
            email: args.email,
            role: args.role,
            phone: args.phone,
            address: args.address,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_id: {}", user.id);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);

    Ok(())
}
