use crate::models::DateTimeSlot;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Symmetric buffer around an existing slot inside which a candidate is
/// considered a conflict. Business rule for double-booking prevention;
/// the bound is not derived from anything else.
pub const CONFLICT_BUFFER_MINUTES: i64 = 15;

const SLOT_FORMAT: &str = "%Y-%m-%d %H:%M";

fn resolve_zone(abbreviation: &str) -> Tz {
    match abbreviation {
        "ET" => chrono_tz::America::New_York,
        "CT" => chrono_tz::America::Chicago,
        "PT" => chrono_tz::America::Los_Angeles,
        // UTC, and any abbreviation the table does not know.
        _ => chrono_tz::UTC,
    }
}

/// Resolve a slot to a UTC instant. Missing or malformed parts yield
/// `None`; callers treat that as "not blocked" (fails open).
pub fn slot_instant(slot: &DateTimeSlot) -> Option<DateTime<Utc>> {
    let date = slot.date.trim();
    let time = slot.time.trim();
    let timezone = slot.timezone.trim();
    if date.is_empty() || time.is_empty() || timezone.is_empty() {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), SLOT_FORMAT).ok()?;
    resolve_zone(timezone)
        .from_local_datetime(&naive)
        .earliest()
        .map(|zoned| zoned.with_timezone(&Utc))
}

/// True when the candidate falls within the inclusive ±15-minute window
/// of any existing slot. Never raises; any slot that fails to resolve is
/// skipped.
pub fn is_blocked(candidate: &DateTimeSlot, existing: &[DateTimeSlot]) -> bool {
    let Some(candidate_at) = slot_instant(candidate) else {
        return false;
    };

    let buffer = Duration::minutes(CONFLICT_BUFFER_MINUTES);
    existing.iter().filter_map(slot_instant).any(|existing_at| {
        candidate_at >= existing_at - buffer && candidate_at <= existing_at + buffer
    })
}

/// Exact date+time+timezone equality, ignoring record ids.
pub fn same_slot(a: &DateTimeSlot, b: &DateTimeSlot) -> bool {
    a.date == b.date && a.time == b.time && a.timezone == b.timezone
}

/// True when any two slots in the set are exact duplicates.
pub fn has_duplicate_slots(slots: &[DateTimeSlot]) -> bool {
    slots
        .iter()
        .enumerate()
        .any(|(index, slot)| slots[index + 1..].iter().any(|other| same_slot(slot, other)))
}

#[cfg(test)]
mod tests {
    use super::{has_duplicate_slots, is_blocked, slot_instant, CONFLICT_BUFFER_MINUTES};
    use crate::models::DateTimeSlot;

    fn slot(date: &str, time: &str, timezone: &str) -> DateTimeSlot {
        DateTimeSlot {
            date: date.to_string(),
            time: time.to_string(),
            timezone: timezone.to_string(),
            id: None,
        }
    }

    #[test]
    fn empty_existing_set_never_blocks() {
        assert!(!is_blocked(&slot("2024-06-01", "10:00", "ET"), &[]));
    }

    #[test]
    fn slot_conflicts_with_itself() {
        let candidate = slot("2024-06-01", "10:00", "ET");
        assert!(is_blocked(&candidate, &[candidate.clone()]));
    }

    #[test]
    fn buffer_boundary_is_inclusive() {
        let existing = vec![slot("2024-06-01", "10:00", "ET")];
        assert!(is_blocked(&slot("2024-06-01", "10:15", "ET"), &existing));
        assert!(!is_blocked(&slot("2024-06-01", "10:16", "ET"), &existing));
        assert!(is_blocked(&slot("2024-06-01", "09:45", "ET"), &existing));
        assert!(!is_blocked(&slot("2024-06-01", "09:44", "ET"), &existing));
    }

    #[test]
    fn ten_minutes_apart_is_blocked() {
        let first = slot("2024-06-01", "10:00", "ET");
        assert!(is_blocked(&slot("2024-06-01", "10:10", "ET"), &[first]));
    }

    #[test]
    fn conflicts_are_detected_across_zones() {
        // 10:00 ET and 09:00 CT are the same instant.
        let eastern = slot("2024-06-01", "10:00", "ET");
        assert!(is_blocked(&slot("2024-06-01", "09:00", "CT"), &[eastern]));
    }

    #[test]
    fn unknown_abbreviation_falls_back_to_utc() {
        let known = slot_instant(&slot("2024-06-01", "10:00", "UTC")).expect("utc instant");
        let unknown = slot_instant(&slot("2024-06-01", "10:00", "XYZ")).expect("fallback instant");
        assert_eq!(known, unknown);
    }

    #[test]
    fn incomplete_or_malformed_slots_fail_open() {
        let existing = vec![slot("2024-06-01", "10:00", "ET")];
        assert!(!is_blocked(&slot("", "10:00", "ET"), &existing));
        assert!(!is_blocked(&slot("2024-06-01", "", "ET"), &existing));
        assert!(!is_blocked(&slot("2024-06-01", "10:00", ""), &existing));
        assert!(!is_blocked(&slot("06/01/2024", "10:00", "ET"), &existing));

        let malformed = vec![slot("junk", "10:00", "ET")];
        assert!(!is_blocked(&slot("2024-06-01", "10:00", "ET"), &malformed));
    }

    #[test]
    fn duplicate_detection_matches_exact_triples_only() {
        let primary = slot("2024-06-01", "10:00", "ET");
        let secondary = slot("2024-06-01", "10:00", "CT");
        assert!(!has_duplicate_slots(&[primary.clone(), secondary]));
        assert!(has_duplicate_slots(&[primary.clone(), primary]));
    }

    #[test]
    fn buffer_constant_is_fifteen_minutes() {
        assert_eq!(CONFLICT_BUFFER_MINUTES, 15);
    }
}
