use clap::{Args, Subcommand};

mod issue;
mod secret;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue a bearer token for an existing user
    Issue(issue::IssueTokenArgs),

    /// Print a freshly generated signing secret
    Secret,
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Issue(args) => issue::run(args).await,
        TokenSubcommand::Secret => {
            secret::run();

            Ok(())
        }
    }
}
