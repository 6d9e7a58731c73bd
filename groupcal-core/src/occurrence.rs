//! Concrete calendar occurrences produced by recurrence expansion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::ContactWorkEntry;

/// One concrete scheduled instance of a contact work entry.
///
/// Occurrences are ephemeral display data, never persisted. The `entry`
/// snapshot carries this occurrence's own start/end, so consumers routing
/// an edit or deletion back to the store see occurrence-specific timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarOccurrence {
    /// Entry id combined with the occurrence start instant; unique across
    /// occurrences of the same entry.
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub entry: ContactWorkEntry,
}

impl CalendarOccurrence {
    pub(crate) fn new(entry: &ContactWorkEntry, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let mut snapshot = entry.clone();
        snapshot.start_time = start;
        snapshot.end_time = end;

        CalendarOccurrence {
            id: format!("{}-{}", entry.id, start.timestamp_millis()),
            start,
            end,
            entry: snapshot,
        }
    }
}
