pub mod console;
pub mod dates;
pub mod errors;
pub mod export;
pub mod forms;
pub mod listing;
pub mod models;
pub mod schema;
pub mod slots;
pub mod status;
pub mod store;

pub use console::{ConsoleCore, USERS_COLLECTION};
pub use errors::{AppError, AppResult};
pub use models::{
    BooleanResponse, ConsoleSettings, DateRange, DateTimeSlot, EntityKind, EntityRecord,
    ExportFormat, ExportResponse, ListQuery, SortOrder, StatusLabel, UserAccount,
};
pub use schema::{schema_for, EntitySchema, ExportColumn};
pub use store::{CollectionStore, MemoryStore, RestStore};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Initialize daily-rolling JSON file logs. Safe to call once per
/// process; later calls fail quietly through the returned error.
pub fn init_tracing(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "console.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
