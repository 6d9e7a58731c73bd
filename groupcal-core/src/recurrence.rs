//! Expansion of recurring entries into concrete occurrences.
//!
//! Expands a contact work entry into the individual occurrences a calendar
//! displays, honoring the entry's recurrence rule and per-occurrence
//! deletions. Expansion is pure: the same entry always yields the same
//! sequence, and the input is never modified.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

use crate::entry::{ContactWorkEntry, DurationUnit, Frequency, RecurrenceDuration, RecurringPattern};
use crate::occurrence::CalendarOccurrence;

/// Upper bound on emitted occurrences per entry. Guarantees termination
/// even for horizons far beyond the duration vocabulary.
const MAX_OCCURRENCES: usize = 500;

/// Horizon applied when a stored pattern carries no duration.
const FALLBACK_MONTHS: u32 = 6;

/// Defaults when a custom duration is missing its count or unit.
const DEFAULT_CUSTOM_COUNT: u32 = 3;

/// Expand an entry into its concrete occurrences, ordered by start.
///
/// Non-recurring entries produce exactly one occurrence equal to the base
/// start/end. Recurring entries produce one occurrence per step of the
/// frequency rule, from the base start up to and including the horizon,
/// skipping any occurrence whose calendar date is marked deleted.
pub fn expand_entry(entry: &ContactWorkEntry) -> Vec<CalendarOccurrence> {
    let pattern = match &entry.recurring_pattern {
        Some(pattern) if entry.is_recurring => pattern,
        _ => return vec![CalendarOccurrence::new(entry, entry.start_time, entry.end_time)],
    };

    let horizon = horizon_end(entry.start_time, pattern);
    let occurrence_length = entry.end_time - entry.start_time;
    let deleted = deleted_date_keys(&entry.deleted_occurrences);

    let mut occurrences = Vec::new();
    let mut cursor = entry.start_time;

    while cursor <= horizon && occurrences.len() < MAX_OCCURRENCES {
        // Deleted occurrences are suppressed but still advance the cursor.
        if !deleted.contains(&cursor.date_naive()) {
            occurrences.push(CalendarOccurrence::new(
                entry,
                cursor,
                cursor + occurrence_length,
            ));
        }

        cursor = match pattern.frequency {
            Frequency::Weekly => cursor + Duration::days(7),
            Frequency::Biweekly => cursor + Duration::days(14),
            Frequency::Monthly => match cursor.checked_add_months(Months::new(1)) {
                Some(next) => next,
                None => break,
            },
        };
    }

    occurrences
}

/// Expand every entry and flatten the results into one schedule, ordered
/// by start. Non-recurring entries pass through as their single occurrence.
pub fn expand_entries(entries: &[ContactWorkEntry]) -> Vec<CalendarOccurrence> {
    let mut occurrences: Vec<CalendarOccurrence> =
        entries.iter().flat_map(expand_entry).collect();

    occurrences.sort_by_key(|occurrence| occurrence.start);
    occurrences
}

/// Compute the last instant up to which occurrences are generated.
///
/// Month arithmetic uses chrono's clamping rule: adding months to a
/// month-end start lands on the last day of a shorter month (Jan 31 plus
/// one month is Feb 29 in a leap year, Feb 28 otherwise).
fn horizon_end(start: DateTime<Utc>, pattern: &RecurringPattern) -> DateTime<Utc> {
    let add_months = |months: u32| {
        start
            .checked_add_months(Months::new(months))
            .unwrap_or(start)
    };

    match pattern.duration {
        Some(RecurrenceDuration::ThreeMonths) => add_months(3),
        Some(RecurrenceDuration::SixMonths) => add_months(6),
        Some(RecurrenceDuration::OneYear) => add_months(12),
        Some(RecurrenceDuration::Custom) => {
            let count = pattern.custom_duration.unwrap_or(DEFAULT_CUSTOM_COUNT);
            match pattern.custom_duration_unit.unwrap_or(DurationUnit::Months) {
                DurationUnit::Weeks => start + Duration::days(i64::from(count) * 7),
                DurationUnit::Months => add_months(count),
            }
        }
        // Stored documents may lack a duration; EntryStore validation keeps
        // new records out of this branch.
        None => add_months(FALLBACK_MONTHS),
    }
}

/// Normalize stored deletion markers to day-granularity date keys.
///
/// Markers are written at UTC midnight, but a time-of-day can survive the
/// round-trip through foreign writers, so comparison always goes through
/// the calendar date.
fn deleted_date_keys(deleted: &[DateTime<Utc>]) -> HashSet<NaiveDate> {
    deleted.iter().map(|marker| marker.date_naive()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Organization;
    use chrono::TimeZone;

    fn make_entry() -> ContactWorkEntry {
        ContactWorkEntry::new(
            "Alex".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 19, 0, 0).unwrap(),
            "Library".to_string(),
            Organization::Yl,
            None,
            None,
        )
    }

    fn make_recurring(frequency: Frequency, duration: Option<RecurrenceDuration>) -> ContactWorkEntry {
        let mut entry = make_entry();
        entry.is_recurring = true;
        entry.recurring_pattern = Some(RecurringPattern {
            frequency,
            duration,
            custom_duration: None,
            custom_duration_unit: None,
            day_of_week: None,
            day_of_month: None,
        });
        entry
    }

    #[test]
    fn test_non_recurring_single_occurrence() {
        let entry = make_entry();
        let occurrences = expand_entry(&entry);

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].start, entry.start_time);
        assert_eq!(occurrences[0].end, entry.end_time);
    }

    #[test]
    fn test_weekly_three_months() {
        let entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::ThreeMonths));
        let occurrences = expand_entry(&entry);

        // 2024-01-01 + 3 months = 2024-04-01, which is exactly 13 weekly
        // steps away, so the boundary occurrence is included.
        assert_eq!(occurrences.len(), 14);
        assert_eq!(
            occurrences[0].start,
            Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[0].end,
            Utc.with_ymd_and_hms(2024, 1, 1, 19, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[1].start,
            Utc.with_ymd_and_hms(2024, 1, 8, 17, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[13].start,
            Utc.with_ymd_and_hms(2024, 4, 1, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_constant_duration_and_spacing() {
        let entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::SixMonths));
        let occurrences = expand_entry(&entry);

        let base_length = entry.end_time - entry.start_time;
        for occurrence in &occurrences {
            assert_eq!(occurrence.end - occurrence.start, base_length);
        }
        for pair in occurrences.windows(2) {
            assert_eq!(pair[1].start - pair[0].start, Duration::days(7));
        }
    }

    #[test]
    fn test_biweekly_step() {
        let entry = make_recurring(Frequency::Biweekly, Some(RecurrenceDuration::ThreeMonths));
        let occurrences = expand_entry(&entry);

        assert!(occurrences.len() > 1);
        for pair in occurrences.windows(2) {
            assert_eq!(pair[1].start - pair[0].start, Duration::days(14));
        }
    }

    #[test]
    fn test_monthly_month_end_clamping() {
        let mut entry = make_recurring(Frequency::Monthly, Some(RecurrenceDuration::ThreeMonths));
        entry.start_time = Utc.with_ymd_and_hms(2024, 1, 31, 17, 0, 0).unwrap();
        entry.end_time = Utc.with_ymd_and_hms(2024, 1, 31, 19, 0, 0).unwrap();

        let occurrences = expand_entry(&entry);
        let starts: Vec<NaiveDate> = occurrences.iter().map(|o| o.start.date_naive()).collect();

        // Successive clamped month additions: once clamped to the 29th the
        // cursor stays there.
        assert_eq!(
            starts,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 29).unwrap(),
            ]
        );
    }

    #[test]
    fn test_deleted_occurrence_suppressed() {
        let mut entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::ThreeMonths));
        entry.deleted_occurrences = vec![Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()];

        let occurrences = expand_entry(&entry);
        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.start.date_naive()).collect();

        assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        assert_eq!(occurrences.len(), 13);
    }

    #[test]
    fn test_deletion_marker_with_time_of_day_still_suppresses() {
        let mut entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::ThreeMonths));
        // A marker written by a foreign client, carrying the occurrence's
        // time-of-day instead of midnight.
        entry.deleted_occurrences = vec![Utc.with_ymd_and_hms(2024, 1, 8, 17, 0, 0).unwrap()];

        let dates: Vec<NaiveDate> = expand_entry(&entry)
            .iter()
            .map(|o| o.start.date_naive())
            .collect();

        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
    }

    #[test]
    fn test_custom_duration_weeks() {
        let mut entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::Custom));
        if let Some(pattern) = &mut entry.recurring_pattern {
            pattern.custom_duration = Some(2);
            pattern.custom_duration_unit = Some(DurationUnit::Weeks);
        }

        let occurrences = expand_entry(&entry);

        // Horizon at start + 14 days: occurrences on day 0, 7 and 14.
        assert_eq!(occurrences.len(), 3);
    }

    #[test]
    fn test_custom_duration_defaults() {
        // Custom duration without a count or unit behaves like 3 months.
        let custom = expand_entry(&make_recurring(
            Frequency::Weekly,
            Some(RecurrenceDuration::Custom),
        ));
        let three_months = expand_entry(&make_recurring(
            Frequency::Weekly,
            Some(RecurrenceDuration::ThreeMonths),
        ));

        assert_eq!(custom.len(), three_months.len());
    }

    #[test]
    fn test_missing_duration_falls_back_to_six_months() {
        let entry = make_recurring(Frequency::Weekly, None);
        let occurrences = expand_entry(&entry);

        // 2024-01-01 + 6 months = 2024-07-01, exactly 26 weekly steps away.
        assert_eq!(occurrences.len(), 27);
        assert_eq!(
            occurrences[26].start,
            Utc.with_ymd_and_hms(2024, 7, 1, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_capped_at_500_occurrences() {
        let mut entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::Custom));
        if let Some(pattern) = &mut entry.recurring_pattern {
            pattern.custom_duration = Some(1200);
            pattern.custom_duration_unit = Some(DurationUnit::Months);
        }

        let occurrences = expand_entry(&entry);
        assert_eq!(occurrences.len(), 500);
    }

    #[test]
    fn test_expansion_is_idempotent_and_nonmutating() {
        let entry = make_recurring(Frequency::Biweekly, Some(RecurrenceDuration::OneYear));
        let before = serde_json::to_value(&entry).unwrap();

        let first = expand_entry(&entry);
        let second = expand_entry(&entry);

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(serde_json::to_value(&entry).unwrap(), before);
    }

    #[test]
    fn test_occurrence_ids_unique_and_snapshot_times_overridden() {
        let mut entry = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::ThreeMonths));
        entry.id = "abc123".to_string();

        let occurrences = expand_entry(&entry);

        let ids: HashSet<&str> = occurrences.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), occurrences.len());

        for occurrence in &occurrences {
            assert!(occurrence.id.starts_with("abc123-"));
            assert_eq!(occurrence.entry.start_time, occurrence.start);
            assert_eq!(occurrence.entry.end_time, occurrence.end);
        }
    }

    #[test]
    fn test_expand_entries_merges_and_sorts() {
        let mut single = make_entry();
        single.start_time = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        single.end_time = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();

        let recurring = make_recurring(Frequency::Weekly, Some(RecurrenceDuration::ThreeMonths));

        let schedule = expand_entries(&[single.clone(), recurring]);

        assert_eq!(schedule.len(), 15);
        for pair in schedule.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        assert!(schedule.iter().any(|o| o.start == single.start_time));
    }
}
