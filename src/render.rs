//! Terminal rendering for groupcal types.
//!
//! Extension traits that add colored one-line rendering to core types
//! using owo_colors.

use groupcal_core::event::Event;
use groupcal_core::occurrence::CalendarOccurrence;
use owo_colors::OwoColorize;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            format_span(&self.start, &self.end).dimmed(),
            self.title,
            format!("[{}]", self.group).cyan(),
        );

        if !self.location.is_empty() {
            line.push_str(&format!(" @ {}", self.location));
        }
        line.push_str(&format!(" {}", self.id.dimmed()));

        line
    }
}

impl Render for CalendarOccurrence {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            format_span(&self.start, &self.end).dimmed(),
            self.entry.person,
            format!("[{}]", self.entry.organization).cyan(),
        );

        if !self.entry.location.is_empty() {
            line.push_str(&format!(" @ {}", self.entry.location));
        }
        if self.entry.is_recurring {
            line.push_str(&format!(" {}", "(recurring)".dimmed()));
        }
        line.push_str(&format!(" {}", self.entry.id.dimmed()));

        line
    }
}

fn format_span(
    start: &chrono::DateTime<chrono::Utc>,
    end: &chrono::DateTime<chrono::Utc>,
) -> String {
    format!(
        "{} {}-{}",
        start.format("%a %Y-%m-%d"),
        start.format("%H:%M"),
        end.format("%H:%M")
    )
}
