use crate::dates::decode_storage_date;
use crate::models::{EntityRecord, ListQuery, SortOrder, StatusLabel};
use crate::schema::EntitySchema;
use crate::status::derive_status;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Sentinel status-filter value that disables status filtering.
pub const STATUS_FILTER_ALL: &str = "All";

/// Turn a raw collection into the display-ready sequence: search, then
/// date-range filter, then status filter, then sort. Strictly ordered;
/// each stage operates on the previous stage's output. The source slice
/// is never mutated and no pagination is applied.
pub fn apply_view(
    items: &[EntityRecord],
    schema: &EntitySchema,
    query: &ListQuery,
    today: NaiveDate,
) -> Vec<EntityRecord> {
    let mut items: Vec<EntityRecord> = items.to_vec();

    if let Some(search) = query.search.as_ref() {
        let needle = search.trim().to_ascii_lowercase();
        if !needle.is_empty() {
            items.retain(|item| {
                schema.search_fields.iter().any(|field| {
                    item.field_str(field)
                        .map(|value| value.to_ascii_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            });
        }
    }

    if let Some(range) = query.date_range.as_ref().filter(|range| !range.is_empty()) {
        // Containment against the filter bounds, not interval overlap.
        // Dates that fail to decode never exclude an item.
        items.retain(|item| {
            if let (Some(lower), Some(start)) = (
                range.from,
                item.field_str(schema.start_date_field)
                    .and_then(decode_storage_date),
            ) {
                if start < lower {
                    return false;
                }
            }
            if let (Some(upper), Some(end)) = (
                range.to,
                item.field_str(schema.end_date_field)
                    .and_then(decode_storage_date),
            ) {
                if end > upper {
                    return false;
                }
            }
            true
        });
    }

    if let Some(status) = query
        .status
        .as_ref()
        .filter(|status| status.as_str() != STATUS_FILTER_ALL)
    {
        items.retain(|item| derive_status(item, schema, today).as_str() == status.as_str());
    }

    if let Some(key) = query.sort_key.as_deref() {
        let descending = query.sort_order == Some(SortOrder::Descending);
        let is_date = schema.date_fields.contains(&key);
        // Vec::sort_by is stable; ties keep insertion order across renders.
        items.sort_by(|a, b| {
            let ordering = compare_by_key(a, b, key, is_date);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    items
}

fn compare_by_key(a: &EntityRecord, b: &EntityRecord, key: &str, is_date: bool) -> Ordering {
    if key == "id" {
        return a.id.cmp(&b.id);
    }

    if is_date {
        let left = a.field_str(key).and_then(decode_storage_date);
        let right = b.field_str(key).and_then(decode_storage_date);
        // Undecodable dates compare as equal, mirroring the codec's
        // always-false comparisons.
        return match (left, right) {
            (Some(left), Some(right)) => left.cmp(&right),
            _ => Ordering::Equal,
        };
    }

    let left = a.field(key);
    let right = b.field(key);
    if let (Some(left), Some(right)) = (
        left.and_then(serde_json::Value::as_f64),
        right.and_then(serde_json::Value::as_f64),
    ) {
        return left.partial_cmp(&right).unwrap_or(Ordering::Equal);
    }

    let left = left.and_then(serde_json::Value::as_str).unwrap_or_default();
    let right = right.and_then(serde_json::Value::as_str).unwrap_or_default();
    left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase())
}

/// Scan a loaded collection for records whose stored status disagrees
/// with the derived one. The caller pushes each correction back to the
/// store as a partial update.
pub fn reconciliation_candidates(
    items: &[EntityRecord],
    schema: &EntitySchema,
    today: NaiveDate,
) -> Vec<(u64, StatusLabel)> {
    items
        .iter()
        .filter_map(|item| {
            let derived = derive_status(item, schema, today);
            if item.field_str(schema.status_field) == Some(derived.as_str()) {
                None
            } else {
                Some((item.id, derived))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{apply_view, reconciliation_candidates, STATUS_FILTER_ALL};
    use crate::models::{DateRange, EntityKind, EntityRecord, ListQuery, SortOrder, StatusLabel};
    use crate::schema::schema_for;
    use chrono::NaiveDate;
    use serde_json::{json, Map, Value};

    fn record(id: u64, fields: Value) -> EntityRecord {
        let map: Map<String, Value> = fields.as_object().expect("object literal").clone();
        EntityRecord::new(id, map)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    fn sample_clients() -> Vec<EntityRecord> {
        vec![
            record(
                1,
                json!({"name": "Acme Corp", "startDate": "01-01-2024", "endDate": "01-01-2020", "status": "Active"}),
            ),
            record(
                2,
                json!({"name": "Borealis", "startDate": "15-02-2024", "endDate": "01-01-2099", "status": "Active"}),
            ),
            record(
                3,
                json!({"name": "acme widgets", "startDate": "01-03-2024", "endDate": "31-12-2024", "status": "Inactive"}),
            ),
        ]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            search: Some("ACME".to_string()),
            ..ListQuery::default()
        };
        let view = apply_view(&sample_clients(), schema, &query, today());
        assert_eq!(
            view.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn unmatched_search_returns_empty() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            search: Some("zebra".to_string()),
            ..ListQuery::default()
        };
        assert!(apply_view(&sample_clients(), schema, &query, today()).is_empty());
    }

    #[test]
    fn engagement_search_matches_any_people_field() {
        let schema = schema_for(EntityKind::Engagement);
        let items = vec![
            record(1, json!({"owner": "Dana", "speaker": "Lee"})),
            record(2, json!({"owner": "Kim", "caterer": "Dana's Kitchen"})),
            record(3, json!({"owner": "Pat", "cohost": "Morgan"})),
        ];
        let query = ListQuery {
            search: Some("dana".to_string()),
            ..ListQuery::default()
        };
        let view = apply_view(&items, schema, &query, today());
        assert_eq!(
            view.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn date_range_filters_by_containment() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            date_range: Some(DateRange {
                from: NaiveDate::from_ymd_opt(2024, 2, 1),
                to: NaiveDate::from_ymd_opt(2099, 1, 1),
            }),
            ..ListQuery::default()
        };
        // Item 1 starts before the lower bound; item 2's end sits exactly
        // on the upper bound and stays (boundary dates are included).
        let view = apply_view(&sample_clients(), schema, &query, today());
        assert_eq!(
            view.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn date_range_with_no_bounds_is_skipped() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            date_range: Some(DateRange::default()),
            ..ListQuery::default()
        };
        assert_eq!(apply_view(&sample_clients(), schema, &query, today()).len(), 3);
    }

    #[test]
    fn status_filter_uses_derived_not_stored() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            status: Some("Active".to_string()),
            ..ListQuery::default()
        };
        // Item 1 stores "Active" but its end date is long past.
        let view = apply_view(&sample_clients(), schema, &query, today());
        assert_eq!(
            view.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn all_sentinel_matches_unfiltered_count() {
        let schema = schema_for(EntityKind::Client);
        let all = ListQuery {
            status: Some(STATUS_FILTER_ALL.to_string()),
            ..ListQuery::default()
        };
        let none = ListQuery::default();
        assert_eq!(
            apply_view(&sample_clients(), schema, &all, today()).len(),
            apply_view(&sample_clients(), schema, &none, today()).len()
        );
    }

    #[test]
    fn date_sort_is_monotonic_ascending() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            sort_key: Some("endDate".to_string()),
            sort_order: Some(SortOrder::Ascending),
            ..ListQuery::default()
        };
        let view = apply_view(&sample_clients(), schema, &query, today());
        let decoded: Vec<_> = view
            .iter()
            .filter_map(|item| {
                item.field_str("endDate")
                    .and_then(crate::dates::decode_storage_date)
            })
            .collect();
        assert!(decoded.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(
            view.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![1, 3, 2]
        );
    }

    #[test]
    fn name_sort_descending() {
        let schema = schema_for(EntityKind::Client);
        let query = ListQuery {
            sort_key: Some("name".to_string()),
            sort_order: Some(SortOrder::Descending),
            ..ListQuery::default()
        };
        let view = apply_view(&sample_clients(), schema, &query, today());
        assert_eq!(
            view.iter().map(|item| item.id).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
    }

    #[test]
    fn reconciliation_flags_only_mismatches() {
        let schema = schema_for(EntityKind::Client);
        let candidates = reconciliation_candidates(&sample_clients(), schema, today());
        assert_eq!(
            candidates,
            vec![(1, StatusLabel::Inactive), (3, StatusLabel::Active)]
        );
    }
}
