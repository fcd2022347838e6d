use crate::errors::{AppError, AppResult};
use crate::export::{flatten_rows, render_document, render_sheet};
use crate::forms::{validate_engagement_slots, validate_required};
use crate::listing::{apply_view, reconciliation_candidates};
use crate::models::{
    BooleanResponse, ConsoleSettings, DateTimeSlot, EntityKind, EntityRecord, ExportFormat,
    ExportResponse, ListQuery, UserAccount,
};
use crate::schema::schema_for;
use crate::slots::is_blocked;
use crate::status::derive_status;
use crate::store::{CollectionStore, RestStore};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// The mock sign-in collection. Scanned client-side like every other
/// collection; not an authentication system.
pub const USERS_COLLECTION: &str = "users";

const ENGAGEMENT_SLOT_FIELDS: [&str; 3] = ["primarySlot", "secondarySlot", "tertiarySlot"];

#[derive(Default)]
struct CacheSlot {
    generation: u64,
    items: Option<Vec<EntityRecord>>,
}

/// Service facade over the collection store: one shared in-memory cache
/// per entity kind, invalidated wholesale on any mutation, plus the
/// list/status/slot/export operations every entity view shares.
pub struct ConsoleCore {
    store: Arc<dyn CollectionStore>,
    settings: ConsoleSettings,
    cache: RwLock<HashMap<EntityKind, CacheSlot>>,
}

impl ConsoleCore {
    pub fn new(store: Arc<dyn CollectionStore>, settings: ConsoleSettings) -> Self {
        Self {
            store,
            settings,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Build a core backed by the REST collection store from settings.
    pub fn connect(settings: ConsoleSettings) -> AppResult<Self> {
        let store = RestStore::new(
            &settings.store_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        Ok(Self::new(Arc::new(store), settings))
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    async fn invalidate(&self, kind: EntityKind) {
        let mut cache = self.cache.write().await;
        let slot = cache.entry(kind).or_default();
        slot.generation = slot.generation.wrapping_add(1);
        slot.items = None;
    }

    async fn load_collection(&self, kind: EntityKind) -> AppResult<Vec<EntityRecord>> {
        let schema = schema_for(kind);
        let generation = {
            let cache = self.cache.read().await;
            match cache.get(&kind) {
                Some(slot) => {
                    if let Some(items) = slot.items.as_ref() {
                        return Ok(items.clone());
                    }
                    slot.generation
                }
                None => 0,
            }
        };

        let raw = self.store.list(schema.collection).await?;
        let items: Vec<EntityRecord> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<EntityRecord>(value) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!(collection = schema.collection, %error, "skipping malformed record");
                    None
                }
            })
            .collect();

        let mut cache = self.cache.write().await;
        let slot = cache.entry(kind).or_default();
        if slot.generation == generation {
            slot.items = Some(items.clone());
        } else {
            // A mutation invalidated the cache while this fetch was in
            // flight; the response must not repopulate it.
            tracing::debug!(collection = schema.collection, "discarding stale collection response");
        }
        Ok(items)
    }

    /// List an entity collection through the full view pipeline, with
    /// `today` pinned by the caller. Stored statuses that disagree with
    /// the derived value are pushed back to the store (last write wins,
    /// no version check) and the cache is invalidated so the correction
    /// is visible on the next fetch.
    pub async fn list_entities_at(
        &self,
        kind: EntityKind,
        query: &ListQuery,
        today: NaiveDate,
    ) -> AppResult<Vec<EntityRecord>> {
        let schema = schema_for(kind);
        let mut items = self.load_collection(kind).await?;

        let corrections = reconciliation_candidates(&items, schema, today);
        if !corrections.is_empty() {
            let mut corrected = false;
            for (id, derived) in &corrections {
                let mut partial = Map::new();
                partial.insert(
                    schema.status_field.to_string(),
                    Value::String(derived.as_str().to_string()),
                );
                match self
                    .store
                    .patch(schema.collection, *id, &Value::Object(partial))
                    .await
                {
                    Ok(_) => corrected = true,
                    Err(error) => {
                        tracing::warn!(collection = schema.collection, id, %error, "status reconciliation patch failed");
                    }
                }
            }
            if corrected {
                self.invalidate(kind).await;
            }
        }

        // The rendered rows always show the derived status.
        for item in &mut items {
            let derived = derive_status(item, schema, today);
            item.set_field(schema.status_field, Value::String(derived.as_str().to_string()));
        }

        Ok(apply_view(&items, schema, query, today))
    }

    pub async fn list_entities(
        &self,
        kind: EntityKind,
        query: &ListQuery,
    ) -> AppResult<Vec<EntityRecord>> {
        self.list_entities_at(kind, query, Self::today()).await
    }

    pub async fn get_entity(&self, kind: EntityKind, id: u64) -> AppResult<Option<EntityRecord>> {
        let schema = schema_for(kind);
        match self.store.get(schema.collection, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Create a record with a client-assigned id of `max(existing) + 1`.
    /// Read-then-write with no lock: two near-simultaneous creates can
    /// compute the same id.
    pub async fn create_entity(
        &self,
        kind: EntityKind,
        fields: Map<String, Value>,
    ) -> AppResult<EntityRecord> {
        let schema = schema_for(kind);
        validate_required(schema, &fields)?;
        if kind == EntityKind::Engagement {
            let slots = engagement_slots(&fields)?;
            validate_engagement_slots(&slots, &[])?;
        }

        let existing = self.load_collection(kind).await?;
        let next_id = existing.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        let record = EntityRecord::new(next_id, fields);

        let created = self
            .store
            .create(schema.collection, &serde_json::to_value(&record)?)
            .await?;
        self.invalidate(kind).await;
        Ok(serde_json::from_value(created)?)
    }

    /// Create an engagement after checking its slots against the
    /// picker's disabled-slot set. Within the engagement's own slots
    /// only exact duplicates are rejected.
    pub async fn create_engagement(
        &self,
        fields: Map<String, Value>,
        disabled_slots: &[DateTimeSlot],
    ) -> AppResult<EntityRecord> {
        let slots = engagement_slots(&fields)?;
        validate_engagement_slots(&slots, disabled_slots)?;
        self.create_entity(EntityKind::Engagement, fields).await
    }

    /// Full replacement of an existing record. Engagement slot rules
    /// apply on edit as well as create.
    pub async fn update_entity(
        &self,
        kind: EntityKind,
        record: EntityRecord,
    ) -> AppResult<EntityRecord> {
        let schema = schema_for(kind);
        validate_required(schema, &record.fields)?;
        if kind == EntityKind::Engagement {
            let slots = engagement_slots(&record.fields)?;
            validate_engagement_slots(&slots, &[])?;
        }
        let replaced = self
            .store
            .replace(schema.collection, record.id, &serde_json::to_value(&record)?)
            .await?;
        self.invalidate(kind).await;
        Ok(serde_json::from_value(replaced)?)
    }

    /// Replace an engagement after checking its slots against the
    /// picker's disabled-slot set, mirroring `create_engagement`.
    pub async fn update_engagement(
        &self,
        record: EntityRecord,
        disabled_slots: &[DateTimeSlot],
    ) -> AppResult<EntityRecord> {
        let slots = engagement_slots(&record.fields)?;
        validate_engagement_slots(&slots, disabled_slots)?;
        self.update_entity(EntityKind::Engagement, record).await
    }

    /// Delete a record. The confirmation gate sits at this boundary:
    /// unconfirmed deletes are rejected before any request is issued.
    /// There is no undo.
    pub async fn delete_entity(
        &self,
        kind: EntityKind,
        id: u64,
        confirmed: bool,
    ) -> AppResult<BooleanResponse> {
        if !confirmed {
            return Err(AppError::Validation(
                "Delete requires user confirmation".to_string(),
            ));
        }
        let schema = schema_for(kind);
        self.store.delete(schema.collection, id).await?;
        self.invalidate(kind).await;
        Ok(BooleanResponse { success: true })
    }

    /// Export the current view to the entity's fixed filename under the
    /// export directory. Both formats consume the same flattened rows.
    pub async fn export_entities_at(
        &self,
        kind: EntityKind,
        query: &ListQuery,
        format: ExportFormat,
        today: NaiveDate,
    ) -> AppResult<ExportResponse> {
        let schema = schema_for(kind);
        let items = self.list_entities_at(kind, query, today).await?;
        let rows = flatten_rows(&items, schema);

        let export_dir = PathBuf::from(&self.settings.export_dir);
        std::fs::create_dir_all(&export_dir).map_err(|error| AppError::Io(error.to_string()))?;
        let output_path =
            export_dir.join(format!("{}.{}", schema.export_basename, format.extension()));

        let contents = match format {
            ExportFormat::Sheet => render_sheet(&rows, schema),
            ExportFormat::Document => {
                render_document(&rows, schema, self.settings.document_rows_per_page)
            }
        };
        std::fs::write(&output_path, contents).map_err(|error| AppError::Io(error.to_string()))?;

        Ok(ExportResponse {
            path: output_path.to_string_lossy().to_string(),
        })
    }

    pub async fn export_entities(
        &self,
        kind: EntityKind,
        query: &ListQuery,
        format: ExportFormat,
    ) -> AppResult<ExportResponse> {
        self.export_entities_at(kind, query, format, Self::today()).await
    }

    /// Scan the mock `users` collection for a matching email/password
    /// pair. Failure is the same generic error regardless of cause.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<UserAccount> {
        let users = self.store.list(USERS_COLLECTION).await?;
        users
            .into_iter()
            .filter_map(|value| serde_json::from_value::<UserAccount>(value).ok())
            .find(|user| user.email == email && user.password == password)
            .ok_or_else(|| AppError::Validation("Error logging in".to_string()))
    }

    /// Picker-facing blocked check for a single candidate slot.
    pub fn check_slot(&self, candidate: &DateTimeSlot, disabled: &[DateTimeSlot]) -> bool {
        is_blocked(candidate, disabled)
    }
}

fn engagement_slots(fields: &Map<String, Value>) -> AppResult<Vec<DateTimeSlot>> {
    let mut slots = Vec::new();
    for field in ENGAGEMENT_SLOT_FIELDS {
        if let Some(value) = fields.get(field).filter(|value| !value.is_null()) {
            let slot: DateTimeSlot = serde_json::from_value(value.clone())
                .map_err(|error| AppError::Validation(format!("Invalid {}: {}", field, error)))?;
            slots.push(slot);
        }
    }
    Ok(slots)
}
