use anyhow::Result;
use clap::Subcommand;
use groupcal_core::entry::{
    ContactWorkEntry, DurationUnit, Frequency, Organization, RecurrenceDuration, RecurringPattern,
};
use groupcal_core::occurrence::CalendarOccurrence;
use groupcal_core::recurrence::expand_entries;
use owo_colors::OwoColorize;

use super::{App, parse_date_end, parse_datetime};
use crate::render::Render;

#[derive(Subcommand)]
pub enum ContactsCommand {
    /// List expanded meeting occurrences
    List {
        /// Only show meetings for this organization (uni, wyld or YL)
        #[arg(short, long)]
        org: Option<Organization>,

        /// Show occurrences from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show occurrences until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print as JSON instead of formatted lines
        #[arg(long)]
        json: bool,
    },
    /// Add a meeting (optionally recurring)
    Add {
        /// Who the meeting is with
        person: String,

        /// Start date/time (e.g. "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time
        #[arg(short, long)]
        end: String,

        /// Sponsoring organization (uni, wyld or YL)
        #[arg(short, long)]
        org: Organization,

        #[arg(short, long, default_value = "")]
        location: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Repeat weekly, biweekly or monthly
        #[arg(long)]
        repeat: Option<Frequency>,

        /// How long the series continues: 3months, 6months, 1year or custom
        /// (default: 6months)
        #[arg(long = "for", requires = "repeat")]
        duration: Option<RecurrenceDuration>,

        /// Custom duration count, with --unit (e.g. --count 8 --unit weeks)
        #[arg(long, requires = "duration")]
        count: Option<u32>,

        /// Custom duration unit: weeks or months
        #[arg(long, requires = "count")]
        unit: Option<DurationUnit>,
    },
    /// Remove a whole series
    Rm { id: String },
    /// Remove a single occurrence of a recurring meeting
    RmOccurrence {
        id: String,

        /// Occurrence date (YYYY-MM-DD)
        date: String,
    },
}

pub async fn run(command: ContactsCommand, identity: Option<String>) -> Result<()> {
    let app = App::load(identity).await?;

    match command {
        ContactsCommand::List {
            org,
            from,
            to,
            json,
        } => list(&app, org, from, to, json).await,
        ContactsCommand::Add {
            person,
            start,
            end,
            org,
            location,
            description,
            repeat,
            duration,
            count,
            unit,
        } => {
            app.gate.require_admin().await?;

            let pattern = repeat.map(|frequency| RecurringPattern {
                frequency,
                duration: Some(duration.unwrap_or(RecurrenceDuration::SixMonths)),
                custom_duration: count,
                custom_duration_unit: unit,
                day_of_week: None,
                day_of_month: None,
            });

            let entry = ContactWorkEntry::new(
                person,
                parse_datetime(&start)?,
                parse_datetime(&end)?,
                location,
                org,
                pattern,
                description,
            );
            let created = app.entries.create(entry).await?;

            println!("{}", format!("Created: {}", created.person).green());
            Ok(())
        }
        ContactsCommand::Rm { id } => {
            app.gate.require_admin().await?;
            app.entries.delete(&id).await?;

            println!("{}", format!("Removed series {id}").green());
            Ok(())
        }
        ContactsCommand::RmOccurrence { id, date } => {
            app.gate.require_admin().await?;
            let occurrence = parse_datetime(&date)?;
            app.entries.mark_occurrence_deleted(&id, occurrence).await?;

            println!("{}", format!("Removed occurrence {date} of {id}").green());
            Ok(())
        }
    }
}

async fn list(
    app: &App,
    org: Option<Organization>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let from = from.as_deref().map(parse_datetime).transpose()?;
    let to = to.as_deref().map(parse_date_end).transpose()?;

    let entries = app.entries.list().await?;

    let occurrences: Vec<CalendarOccurrence> = expand_entries(&entries)
        .into_iter()
        .filter(|occurrence| org.is_none_or(|org| occurrence.entry.organization == org))
        .filter(|occurrence| from.is_none_or(|from| occurrence.start >= from))
        .filter(|occurrence| to.is_none_or(|to| occurrence.start <= to))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    if occurrences.is_empty() {
        println!("{}", "No meetings found".dimmed());
        return Ok(());
    }

    for occurrence in &occurrences {
        println!("{}", occurrence.render());
    }

    Ok(())
}
