use anyhow::Result;
use owo_colors::OwoColorize;

use super::App;

pub async fn run(identity: Option<String>) -> Result<()> {
    let app = App::load(identity).await?;
    let session = app.gate.session().await;

    match &session.identity {
        Some(identity) => {
            let role = if session.is_admin {
                "admin".green().to_string()
            } else {
                "member".to_string()
            };
            println!("{} ({role})", identity.bold());
        }
        None => println!("{}", "Not signed in".dimmed()),
    }

    Ok(())
}
