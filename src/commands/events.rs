use anyhow::Result;
use clap::Subcommand;
use groupcal_core::event::{Event, Group};
use owo_colors::OwoColorize;

use super::{App, parse_date_end, parse_datetime};
use crate::render::Render;

#[derive(Subcommand)]
pub enum EventsCommand {
    /// List events
    List {
        /// Only show events for this group
        #[arg(short, long)]
        group: Option<Group>,

        /// Show events from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print as JSON instead of formatted lines
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        title: String,

        /// Start date/time (e.g. "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time
        #[arg(short, long)]
        end: String,

        /// Owning group (YoungLife, WyldLife, YLUni, Inne or Joint)
        #[arg(short, long)]
        group: Group,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "")]
        location: String,

        /// External link (e.g. a Facebook event)
        #[arg(long)]
        url: Option<String>,
    },
    /// Remove an event
    Rm { id: String },
}

pub async fn run(command: EventsCommand, identity: Option<String>) -> Result<()> {
    let app = App::load(identity).await?;

    match command {
        EventsCommand::List {
            group,
            from,
            to,
            json,
        } => list(&app, group, from, to, json).await,
        EventsCommand::Add {
            title,
            start,
            end,
            group,
            description,
            location,
            url,
        } => {
            app.gate.require_admin().await?;

            let event = Event::new(
                title,
                parse_datetime(&start)?,
                parse_datetime(&end)?,
                group,
                description,
                location,
                url,
            );
            let created = app.events.create(event).await?;

            println!("{}", format!("Created: {}", created.title).green());
            Ok(())
        }
        EventsCommand::Rm { id } => {
            app.gate.require_admin().await?;
            app.events.delete(&id).await?;

            println!("{}", format!("Removed event {id}").green());
            Ok(())
        }
    }
}

async fn list(
    app: &App,
    group: Option<Group>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let from = from.as_deref().map(parse_datetime).transpose()?;
    let to = to.as_deref().map(parse_date_end).transpose()?;

    let events: Vec<Event> = app
        .events
        .list()
        .await?
        .into_iter()
        .filter(|event| group.is_none_or(|g| belongs_to(event, g)))
        .filter(|event| from.is_none_or(|from| event.start >= from))
        .filter(|event| to.is_none_or(|to| event.start <= to))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}

/// Joint events count for every group they list as participating.
fn belongs_to(event: &Event, group: Group) -> bool {
    if event.group == group {
        return true;
    }

    event
        .groups
        .as_ref()
        .is_some_and(|groups| groups.contains(&group))
}
