use anyhow::Result;
use config::Config;
use serde::Deserialize;
use std::path::PathBuf;

pub mod cli;
pub mod display;
pub mod error;
pub mod manager;
pub mod models;
pub mod resolve;
pub mod store;

pub use crate::error::AttendanceError;
pub use crate::manager::{AttendanceManager, DATE_FORMAT, MarkOutcome};
pub use crate::models::{AttendanceTable, PresentStudent, StudentRecord};
pub use crate::store::{AttendanceStore, CsvStore};

/// Where the attendance sheet is kept when nothing else is configured.
pub const DEFAULT_STORE_PATH: &str = "attendance.csv";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub store: StoreSettings,
}

#[derive(Debug, Deserialize)]
pub struct StoreSettings {
    pub path: PathBuf,
}

/// Loads settings from an optional `config.toml`, then from `ROLLCALL_*` environment variables
/// (including any set in a `.env` file). For example, `ROLLCALL_STORE__PATH` sets `store.path`.
pub fn load_settings() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .set_default("store.path", DEFAULT_STORE_PATH)?
        .add_source(config::File::with_name("config").required(false))
        .add_source(
            config::Environment::with_prefix("ROLLCALL")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Creates a manager over the CSV sheet at `path`, or at the configured path if `path` is `None`.
pub fn create_default_manager(path: Option<PathBuf>) -> Result<AttendanceManager> {
    let path = match path {
        Some(path) => path,
        None => load_settings()?.store.path,
    };

    Ok(AttendanceManager::new(CsvStore::new(path)))
}
