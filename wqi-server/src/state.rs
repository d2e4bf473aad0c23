//! Shared application state.

use crate::chat::ChatClient;
use crate::config::Config;
use std::path::PathBuf;
use std::sync::Mutex;
use wqi_core::{Profile, StatusScale};
use wqi_db::Database;

/// State shared by all request handlers via `Arc`.
pub struct AppState {
    pub db: Database,
    pub profile: Profile,
    pub scale: StatusScale,
    pub chat: ChatClient,
    pub data_dir: PathBuf,
    /// Serializes appends to the IoT CSV log.
    pub iot_log: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let db = Database::open(&config.database_path)?;
        Self::with_database(db, config)
    }

    /// Build state around an existing database handle; tests use this
    /// with an in-memory database.
    pub fn with_database(db: Database, config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            profile: config.profile,
            scale: StatusScale::default(),
            chat: ChatClient::new(config.chat)?,
            data_dir: config.data_dir,
            iot_log: Mutex::new(()),
        })
    }
}
