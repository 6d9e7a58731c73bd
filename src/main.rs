mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "groupcal")]
#[command(about = "Manage group events and recurring contact work meetings")]
struct Cli {
    /// Act as this identity instead of the configured one
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    identity: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organizational events
    #[command(subcommand)]
    Events(commands::events::EventsCommand),

    /// Contact work meetings
    #[command(subcommand)]
    Contacts(commands::contacts::ContactsCommand),

    /// Admin membership (operator tooling, bypasses the session gate)
    #[command(subcommand)]
    Admins(commands::admins::AdminsCommand),

    /// Show or change configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show the resolved capability state
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Events(command) => commands::events::run(command, cli.identity).await,
        Commands::Contacts(command) => commands::contacts::run(command, cli.identity).await,
        Commands::Admins(command) => commands::admins::run(command).await,
        Commands::Config(command) => commands::config::run(command),
        Commands::Whoami => commands::whoami::run(cli.identity).await,
    }
}
