//! Organizational event types.
//!
//! Events are the second scheduling view next to contact work: single
//! dated happenings owned by one group (or jointly by several), with no
//! recurrence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group an organizational event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Group {
    YoungLife,
    WyldLife,
    #[serde(rename = "YLUni")]
    YlUni,
    Inne,
    Joint,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Group::YoungLife => "YoungLife",
            Group::WyldLife => "WyldLife",
            Group::YlUni => "YLUni",
            Group::Inne => "Inne",
            Group::Joint => "Joint",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "younglife" => Ok(Group::YoungLife),
            "wyldlife" => Ok(Group::WyldLife),
            "yluni" => Ok(Group::YlUni),
            "inne" => Ok(Group::Inne),
            "joint" => Ok(Group::Joint),
            _ => Err(format!(
                "Unknown group '{s}'. Expected YoungLife, WyldLife, YLUni, Inne or Joint"
            )),
        }
    }
}

/// An organizational event (single occurrence, no recurrence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub group: Group,

    /// Participating groups for joint events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,

    pub description: String,
    pub location: String,

    /// External link (e.g. a Facebook event).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Event {
    /// Build a new event. The id is a placeholder until the event store
    /// persists it.
    pub fn new(
        title: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        group: Group,
        description: String,
        location: String,
        url: Option<String>,
    ) -> Self {
        Event {
            id: String::new(),
            title,
            start,
            end,
            group,
            groups: None,
            description,
            location,
            url,
        }
    }
}
