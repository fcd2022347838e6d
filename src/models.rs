use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The business record types the console manages. Every kind shares the
/// same CRUD lifecycle and is configured declaratively in `schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Client,
    Vendor,
    Role,
    Permission,
    PermissionGroup,
    FunctionalArea,
    Product,
    Topic,
    Content,
    Profile,
    Engagement,
}

impl EntityKind {
    pub const ALL: [Self; 11] = [
        Self::Client,
        Self::Vendor,
        Self::Role,
        Self::Permission,
        Self::PermissionGroup,
        Self::FunctionalArea,
        Self::Product,
        Self::Topic,
        Self::Content,
        Self::Profile,
        Self::Engagement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Vendor => "vendor",
            Self::Role => "role",
            Self::Permission => "permission",
            Self::PermissionGroup => "permission-group",
            Self::FunctionalArea => "functional-area",
            Self::Product => "product",
            Self::Topic => "topic",
            Self::Content => "content",
            Self::Profile => "profile",
            Self::Engagement => "engagement",
        }
    }
}

/// One record of any entity kind. Field sets vary per kind and relations
/// are denormalized name strings or `{value,label}` pairs, so everything
/// beyond the id stays a schema-shaped JSON map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(id: u64, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }
}

/// Derived Active/Inactive label. The stored `status` field is never
/// authoritative; the end date compared to "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    Active,
    Inactive,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Parameters for one list-view render: free-text search, optional date
/// bounds, status filter (the sentinel `"All"` disables it), and sort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
    pub status: Option<String>,
    pub sort_key: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// A candidate meeting instant: calendar date, wall-clock time, and a
/// timezone abbreviation (ET/CT/PT/UTC; anything else resolves to UTC).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeSlot {
    pub date: String,
    pub time: String,
    pub timezone: String,
    pub id: Option<u64>,
}

/// A row of the mock `users` collection. Sign-in scans this list
/// client-side; it is not a real authentication system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Sheet,
    Document,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Sheet => "csv",
            Self::Document => "txt",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleSettings {
    pub store_base_url: String,
    pub request_timeout_secs: u64,
    pub export_dir: String,
    pub document_rows_per_page: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            store_base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            export_dir: "exports".to_string(),
            document_rows_per_page: 40,
        }
    }
}
