use crate::models::EntityKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct ExportColumn {
    pub header: &'static str,
    pub field: &'static str,
}

/// Declarative per-entity configuration. One table drives the list
/// controller, form validation, status derivation, and export for every
/// entity kind; there are no per-entity modules.
#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub display_name: &'static str,
    /// Resource path on the collection store.
    pub collection: &'static str,
    pub name_field: &'static str,
    /// Free-text fields the search term is matched against (OR).
    pub search_fields: &'static [&'static str],
    pub required_fields: &'static [&'static str],
    pub status_field: &'static str,
    pub start_date_field: &'static str,
    /// Field the Active/Inactive status is derived from.
    pub end_date_field: &'static str,
    /// Fields decoded through the date codec when sorted on.
    pub date_fields: &'static [&'static str],
    /// Fields holding arrays of related-entity names or `{value,label}` pairs.
    pub relation_fields: &'static [&'static str],
    pub export_columns: &'static [ExportColumn],
    /// Fixed export filename stem, one per entity type.
    pub export_basename: &'static str,
}

const fn col(header: &'static str, field: &'static str) -> ExportColumn {
    ExportColumn { header, field }
}

const STANDARD_DATES: &[&str] = &["startDate", "endDate"];

static SCHEMAS: &[EntitySchema] = &[
    EntitySchema {
        kind: EntityKind::Client,
        display_name: "Clients",
        collection: "clients",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["vendors", "products"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Vendors", "vendors"),
            col("Products", "products"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "clients",
    },
    EntitySchema {
        kind: EntityKind::Vendor,
        display_name: "Vendors",
        collection: "vendors",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["clients"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Clients", "clients"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "vendors",
    },
    EntitySchema {
        kind: EntityKind::Role,
        display_name: "Roles",
        collection: "roles",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["permissionGroups"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Permission Groups", "permissionGroups"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "roles",
    },
    EntitySchema {
        kind: EntityKind::Permission,
        display_name: "Permissions",
        collection: "permissions",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["functionalAreas"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Functional Areas", "functionalAreas"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "permissions",
    },
    EntitySchema {
        kind: EntityKind::PermissionGroup,
        display_name: "Permission Groups",
        collection: "permission-groups",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["permissions"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Permissions", "permissions"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "permission-groups",
    },
    EntitySchema {
        kind: EntityKind::FunctionalArea,
        display_name: "Functional Areas",
        collection: "functional-areas",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &[],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "functional-areas",
    },
    EntitySchema {
        kind: EntityKind::Product,
        display_name: "Products",
        collection: "products",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["topics"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Topics", "topics"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "products",
    },
    EntitySchema {
        kind: EntityKind::Topic,
        display_name: "Topics",
        collection: "topics",
        name_field: "name",
        search_fields: &["name"],
        required_fields: &["name", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["products"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Definition", "definition"),
            col("Products", "products"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "topics",
    },
    EntitySchema {
        kind: EntityKind::Content,
        display_name: "Content",
        collection: "contents",
        name_field: "title",
        search_fields: &["title", "author"],
        required_fields: &["title", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["topics"],
        export_columns: &[
            col("Id", "id"),
            col("Title", "title"),
            col("Author", "author"),
            col("Topics", "topics"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "contents",
    },
    EntitySchema {
        kind: EntityKind::Profile,
        display_name: "Profiles",
        collection: "profiles",
        name_field: "name",
        search_fields: &["name", "email"],
        required_fields: &["name", "email", "startDate", "endDate"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["roles"],
        export_columns: &[
            col("Id", "id"),
            col("Name", "name"),
            col("Email", "email"),
            col("Roles", "roles"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "profiles",
    },
    EntitySchema {
        kind: EntityKind::Engagement,
        display_name: "Engagements",
        collection: "engagements",
        name_field: "owner",
        search_fields: &["owner", "speaker", "caterer", "cohost"],
        required_fields: &["owner", "startDate", "endDate", "primarySlot"],
        status_field: "status",
        start_date_field: "startDate",
        end_date_field: "endDate",
        date_fields: STANDARD_DATES,
        relation_fields: &["clients"],
        export_columns: &[
            col("Id", "id"),
            col("Owner", "owner"),
            col("Speaker", "speaker"),
            col("Caterer", "caterer"),
            col("Cohost", "cohost"),
            col("Clients", "clients"),
            col("Start Date", "startDate"),
            col("End Date", "endDate"),
            col("Status", "status"),
        ],
        export_basename: "engagements",
    },
];

static SCHEMA_INDEX: Lazy<HashMap<EntityKind, &'static EntitySchema>> =
    Lazy::new(|| SCHEMAS.iter().map(|schema| (schema.kind, schema)).collect());

pub fn schema_for(kind: EntityKind) -> &'static EntitySchema {
    SCHEMA_INDEX[&kind]
}

#[cfg(test)]
mod tests {
    use super::{schema_for, SCHEMAS};
    use crate::models::EntityKind;

    #[test]
    fn every_kind_has_a_schema() {
        for kind in EntityKind::ALL {
            let schema = schema_for(kind);
            assert_eq!(schema.kind, kind);
            assert!(!schema.collection.is_empty());
            assert!(!schema.search_fields.is_empty());
            assert!(!schema.export_columns.is_empty());
        }
        assert_eq!(SCHEMAS.len(), EntityKind::ALL.len());
    }

    #[test]
    fn engagement_searches_all_people_fields() {
        let schema = schema_for(EntityKind::Engagement);
        for field in ["owner", "speaker", "caterer", "cohost"] {
            assert!(schema.search_fields.contains(&field));
        }
    }
}
