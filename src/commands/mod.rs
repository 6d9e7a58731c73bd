//! CLI command implementations.

pub mod admins;
pub mod config;
pub mod contacts;
pub mod events;
pub mod whoami;

use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use groupcal_core::config::GroupCalConfig;
use groupcal_core::session::SessionGate;
use groupcal_core::store::{AdminDirectory, EntryStore, EventStore, LocalStore};

/// Shared wiring for all commands: typed stores over the configured data
/// directory, plus the session gate for the active identity.
pub struct App {
    pub entries: EntryStore,
    pub events: EventStore,
    pub gate: SessionGate,
}

impl App {
    /// Wire up the stores and resolve the session for `identity_override`
    /// (falling back to the configured identity). The admin check has
    /// completed by the time this returns, so commands see a resolved
    /// capability state.
    pub async fn load(identity_override: Option<String>) -> Result<Self> {
        let config = GroupCalConfig::load()?;

        let store = Arc::new(LocalStore::new(config.data_path()));
        let admins = Arc::new(AdminDirectory::new(store.clone()));
        let gate = SessionGate::new(admins);

        let identity = identity_override.or(config.identity);
        gate.on_identity_change(identity.as_deref()).await;

        Ok(App {
            entries: EntryStore::new(store.clone()),
            events: EventStore::new(store),
            gate,
        })
    }
}

/// Parse "YYYY-MM-DDTHH:MM" (or "YYYY-MM-DD" as midnight) as a UTC instant.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }

    bail!("Invalid date '{s}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")
}

/// Parse YYYY-MM-DD as end of day, for inclusive range upper bounds.
pub fn parse_date_end(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format '{s}'. Expected YYYY-MM-DD"))?;

    Ok(date.and_hms_opt(23, 59, 59).unwrap().and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_accepts_date_and_datetime() {
        assert_eq!(
            parse_datetime("2024-03-20T15:30").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 20, 15, 30, 0).unwrap()
        );
        assert_eq!(
            parse_datetime("2024-03-20").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap()
        );
        assert!(parse_datetime("20/03/2024").is_err());
    }

    #[test]
    fn test_parse_date_end_is_inclusive() {
        assert_eq!(
            parse_date_end("2024-03-20").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 20, 23, 59, 59).unwrap()
        );
    }
}
