use crate::dates::decode_storage_date;
use crate::models::{EntityRecord, StatusLabel};
use crate::schema::EntitySchema;
use chrono::NaiveDate;

/// Derive Active/Inactive from an end-date string. `today` is threaded
/// explicitly so tests can pin the clock. A missing or malformed end date
/// derives `Inactive` (the `end >= today` test is silently false).
pub fn derive_from_end_date(end_date: Option<&str>, today: NaiveDate) -> StatusLabel {
    match end_date.and_then(decode_storage_date) {
        Some(end) if end >= today => StatusLabel::Active,
        _ => StatusLabel::Inactive,
    }
}

/// Derive a record's status from its schema-designated end-date field.
pub fn derive_status(record: &EntityRecord, schema: &EntitySchema, today: NaiveDate) -> StatusLabel {
    derive_from_end_date(record.field_str(schema.end_date_field), today)
}

#[cfg(test)]
mod tests {
    use super::derive_from_end_date;
    use crate::models::StatusLabel;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    #[test]
    fn future_end_date_is_active() {
        assert_eq!(
            derive_from_end_date(Some("01-01-2099"), today()),
            StatusLabel::Active
        );
    }

    #[test]
    fn past_end_date_is_inactive() {
        assert_eq!(
            derive_from_end_date(Some("01-01-2020"), today()),
            StatusLabel::Inactive
        );
    }

    #[test]
    fn end_date_equal_to_today_is_active() {
        assert_eq!(
            derive_from_end_date(Some("01-06-2024"), today()),
            StatusLabel::Active
        );
    }

    #[test]
    fn missing_or_malformed_end_date_is_inactive() {
        assert_eq!(derive_from_end_date(None, today()), StatusLabel::Inactive);
        assert_eq!(
            derive_from_end_date(Some("not-a-date"), today()),
            StatusLabel::Inactive
        );
    }
}
