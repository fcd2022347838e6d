use crate::errors::{AppError, AppResult};
use crate::models::DateTimeSlot;
use crate::schema::EntitySchema;
use crate::slots::{has_duplicate_slots, is_blocked, same_slot};
use serde_json::{Map, Value};

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(elements) => elements.is_empty(),
        _ => false,
    }
}

/// Schema-driven required-field check. Submission is blocked before any
/// request is issued; the error names every offending field.
pub fn validate_required(schema: &EntitySchema, fields: &Map<String, Value>) -> AppResult<()> {
    let missing: Vec<&str> = schema
        .required_fields
        .iter()
        .copied()
        .filter(|field| fields.get(*field).map(is_blank).unwrap_or(true))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Slot rules for the engagement picker. Within the engagement's own
/// slots only exact date+time+timezone duplicates are rejected; the
/// 15-minute buffer runs solely against the caller-supplied disabled
/// set, with the candidate's own saved slot excluded from it. Whether
/// the buffer should also apply between an engagement's own slots is
/// pending product clarification.
///
/// The self-exclusion is deliberately the full triple rather than the
/// date alone: matching by date would also skip distinct same-day
/// slots in the disabled set. Do not loosen it to a date match without
/// product sign-off.
pub fn validate_engagement_slots(
    slots: &[DateTimeSlot],
    disabled: &[DateTimeSlot],
) -> AppResult<()> {
    if has_duplicate_slots(slots) {
        return Err(AppError::Validation("Duplicate time slot".to_string()));
    }

    for slot in slots {
        let others: Vec<DateTimeSlot> = disabled
            .iter()
            .filter(|existing| !same_slot(existing, slot))
            .cloned()
            .collect();
        if is_blocked(slot, &others) {
            return Err(AppError::Validation(format!(
                "Slot {} {} {} conflicts with a blocked slot",
                slot.date, slot.time, slot.timezone
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_engagement_slots, validate_required};
    use crate::errors::AppError;
    use crate::models::{DateTimeSlot, EntityKind};
    use crate::schema::schema_for;
    use serde_json::{json, Map, Value};

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().expect("object literal").clone()
    }

    fn slot(date: &str, time: &str, timezone: &str) -> DateTimeSlot {
        DateTimeSlot {
            date: date.to_string(),
            time: time.to_string(),
            timezone: timezone.to_string(),
            id: None,
        }
    }

    #[test]
    fn complete_form_passes() {
        let schema = schema_for(EntityKind::Client);
        let form = fields(json!({
            "name": "Acme",
            "startDate": "01-01-2024",
            "endDate": "31-12-2024"
        }));
        assert!(validate_required(schema, &form).is_ok());
    }

    #[test]
    fn missing_and_blank_fields_are_reported() {
        let schema = schema_for(EntityKind::Client);
        let form = fields(json!({"name": "  ", "startDate": "01-01-2024"}));
        let error = validate_required(schema, &form).expect_err("should fail");
        match error {
            AppError::Validation(message) => {
                assert!(message.contains("name"));
                assert!(message.contains("endDate"));
                assert!(!message.contains("startDate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_triple_is_rejected() {
        let primary = slot("2024-06-01", "10:00", "ET");
        let error = validate_engagement_slots(&[primary.clone(), primary], &[])
            .expect_err("duplicate should fail");
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[test]
    fn near_slots_within_one_engagement_are_allowed() {
        // Only exact duplicates are rejected inside the triple; the
        // buffer is not applied between an engagement's own slots.
        let primary = slot("2024-06-01", "10:00", "ET");
        let secondary = slot("2024-06-01", "10:10", "ET");
        assert!(validate_engagement_slots(&[primary, secondary], &[]).is_ok());
    }

    #[test]
    fn disabled_set_blocks_buffered_conflicts() {
        let primary = slot("2024-06-01", "10:10", "ET");
        let disabled = vec![slot("2024-06-01", "10:00", "ET")];
        let error =
            validate_engagement_slots(&[primary], &disabled).expect_err("conflict should fail");
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[test]
    fn own_saved_slot_is_excluded_from_disabled_set() {
        let primary = slot("2024-06-01", "10:00", "ET");
        let disabled = vec![primary.clone()];
        assert!(validate_engagement_slots(&[primary], &disabled).is_ok());
    }
}
