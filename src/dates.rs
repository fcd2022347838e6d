use chrono::NaiveDate;

/// Storage format for every entity date field: zero-padded `DD-MM-YYYY`.
pub const STORAGE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Decode a storage date string. Empty or malformed input yields `None`,
/// so downstream comparisons are simply false; nothing ever raises here.
pub fn decode_storage_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, STORAGE_DATE_FORMAT).ok()
}

/// Encode a calendar date into the storage form, zero-padding day and month.
pub fn encode_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{decode_storage_date, encode_storage_date};
    use chrono::NaiveDate;

    #[test]
    fn round_trips_valid_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let encoded = encode_storage_date(date);
        assert_eq!(encoded, "01-06-2024");
        assert_eq!(decode_storage_date(&encoded), Some(date));
    }

    #[test]
    fn encodes_with_zero_padding() {
        let date = NaiveDate::from_ymd_opt(1999, 3, 5).expect("valid date");
        assert_eq!(encode_storage_date(date), "05-03-1999");
    }

    #[test]
    fn accepts_unpadded_input() {
        assert_eq!(
            decode_storage_date("1-6-2024"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn malformed_input_decodes_to_none() {
        assert_eq!(decode_storage_date(""), None);
        assert_eq!(decode_storage_date("   "), None);
        assert_eq!(decode_storage_date("aa-bb-cccc"), None);
        assert_eq!(decode_storage_date("2024-06-01"), None);
        assert_eq!(decode_storage_date("32-01-2024"), None);
    }
}
