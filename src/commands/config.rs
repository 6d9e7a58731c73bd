use anyhow::Result;
use clap::Subcommand;
use groupcal_core::config::GroupCalConfig;
use owo_colors::OwoColorize;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show configuration and paths
    Show,
    /// Set the identity used for this machine's sessions
    SetIdentity { email: String },
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(),
        ConfigCommand::SetIdentity { email } => {
            let mut config = GroupCalConfig::load()?;
            config.identity = Some(email.clone());
            config.save()?;

            println!("{}", format!("Identity set to {email}").green());
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config_path = GroupCalConfig::config_path()?;
    let config = GroupCalConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_path().display());
    println!();
    println!("{}", "Session".bold());
    match &config.identity {
        Some(identity) => println!("  Identity: {identity}"),
        None => println!("  Identity: {}", "not set".dimmed()),
    }

    Ok(())
}
