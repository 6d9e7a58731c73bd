use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use groupcal_core::config::GroupCalConfig;
use groupcal_core::store::{AdminDirectory, LocalStore};
use owo_colors::OwoColorize;

#[derive(Subcommand)]
pub enum AdminsCommand {
    /// Grant admin capability to an identity
    Add { email: String },
    /// Revoke admin capability
    Rm { email: String },
    /// List privileged identities
    List,
}

/// Operator tooling with direct store access; the session gate does not
/// apply here. Whoever can run this against the data directory already
/// controls it.
pub async fn run(command: AdminsCommand) -> Result<()> {
    let config = GroupCalConfig::load()?;
    let directory = AdminDirectory::new(Arc::new(LocalStore::new(config.data_path())));

    match command {
        AdminsCommand::Add { email } => {
            directory.add(&email).await?;
            println!("{}", format!("Granted admin capability to {email}").green());
        }
        AdminsCommand::Rm { email } => {
            directory.remove(&email).await?;
            println!("{}", format!("Revoked admin capability from {email}").green());
        }
        AdminsCommand::List => {
            let identities = directory.list().await?;
            if identities.is_empty() {
                println!("{}", "No admins configured".dimmed());
            }
            for identity in identities {
                println!("{identity}");
            }
        }
    }

    Ok(())
}
