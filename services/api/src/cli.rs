use crate::admin::{
    run_import, run_set_trust, run_user_create, ImportArgs, TrustArgs, UserCreateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use reliefmap::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ReliefMap API",
    about = "Serve the ReliefMap restroom API and run store maintenance tasks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load an official restroom dataset (CSV) into the location store
    Import(ImportArgs),
    /// Manage contributor accounts
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a contributor
    Create(UserCreateArgs),
    /// Change a contributor's trust score; existing reviews keep their snapshot
    Trust(TrustArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => run_import(args),
        Command::User {
            command: UserCommand::Create(args),
        } => run_user_create(args),
        Command::User {
            command: UserCommand::Trust(args),
        } => run_set_trust(args),
    }
}
