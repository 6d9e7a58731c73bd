//! Contact work entry types.
//!
//! A `ContactWorkEntry` is the persisted definition of a single meeting or
//! recurring-meeting series. It is the source record: recurring entries are
//! turned into concrete occurrences by the `recurrence` module, never here.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Sponsoring group for a contact work entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Organization {
    #[serde(rename = "uni")]
    Uni,
    #[serde(rename = "wyld")]
    Wyld,
    #[serde(rename = "YL")]
    Yl,
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Organization::Uni => "uni",
            Organization::Wyld => "wyld",
            Organization::Yl => "YL",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Organization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uni" => Ok(Organization::Uni),
            "wyld" => Ok(Organization::Wyld),
            "yl" => Ok(Organization::Yl),
            _ => Err(format!("Unknown organization '{s}'. Expected uni, wyld or YL")),
        }
    }
}

/// How often a recurring entry repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(format!(
                "Unknown frequency '{s}'. Expected weekly, biweekly or monthly"
            )),
        }
    }
}

/// How long a recurring series continues, measured from the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceDuration {
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "custom")]
    Custom,
}

impl FromStr for RecurrenceDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "3months" => Ok(RecurrenceDuration::ThreeMonths),
            "6months" => Ok(RecurrenceDuration::SixMonths),
            "1year" => Ok(RecurrenceDuration::OneYear),
            "custom" => Ok(RecurrenceDuration::Custom),
            _ => Err(format!(
                "Unknown duration '{s}'. Expected 3months, 6months, 1year or custom"
            )),
        }
    }
}

/// Unit for custom series durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Weeks,
    Months,
}

impl FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weeks" => Ok(DurationUnit::Weeks),
            "months" => Ok(DurationUnit::Months),
            _ => Err(format!("Unknown unit '{s}'. Expected weeks or months")),
        }
    }
}

/// Recurrence rule for a contact work entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    pub frequency: Frequency,

    /// How long the series continues. Stored documents may lack this field;
    /// expansion falls back to six months when it is absent.
    #[serde(default)]
    pub duration: Option<RecurrenceDuration>,

    /// Custom duration count (e.g. 2, 8, 15); used when `duration` is `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_duration: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_duration_unit: Option<DurationUnit>,

    /// Weekday of the first occurrence (0 = Sunday). Informational only:
    /// generation advances by calendar arithmetic from the start instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,

    /// Day-of-month of the first occurrence. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
}

/// A contact work meeting definition (possibly recurring).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactWorkEntry {
    pub id: String,

    /// Who the meeting is with.
    pub person: String,

    /// Start of the first occurrence.
    pub start_time: DateTime<Utc>,

    /// End of the first occurrence. Every generated occurrence keeps the
    /// base duration `end_time - start_time`.
    pub end_time: DateTime<Utc>,

    pub location: String,
    pub organization: Organization,

    pub is_recurring: bool,

    /// Present iff `is_recurring`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,

    /// Individually deleted occurrences, stored at UTC midnight of the
    /// occurrence's calendar date.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_occurrences: Vec<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Audit timestamps, set and refreshed by the entry store.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactWorkEntry {
    /// Build a new entry. The id and audit timestamps are placeholders
    /// until the entry store persists it.
    ///
    /// The informational weekday/day-of-month fields of the pattern are
    /// stamped from `start_time` here so stored rules always reflect their
    /// first occurrence.
    pub fn new(
        person: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        location: String,
        organization: Organization,
        recurring_pattern: Option<RecurringPattern>,
        description: Option<String>,
    ) -> Self {
        let recurring_pattern = recurring_pattern.map(|mut pattern| {
            pattern.day_of_week = Some(start_time.weekday().num_days_from_sunday() as u8);
            pattern.day_of_month = Some(start_time.day() as u8);
            pattern
        });

        let now = Utc::now();

        ContactWorkEntry {
            id: String::new(),
            person,
            start_time,
            end_time,
            location,
            organization,
            is_recurring: recurring_pattern.is_some(),
            recurring_pattern,
            deleted_occurrences: Vec::new(),
            description,
            created_at: now,
            updated_at: now,
        }
    }
}
