//! SQLite storage layer for water-quality monitoring data.
//!
//! This crate wraps a single `rusqlite` connection behind a cheaply
//! cloneable handle and exposes typed query methods for the three tables
//! the service persists:
//!
//! - `locations` - user-added monitoring points (lat/lng, optional name)
//! - `water_samples` - per-location readings with a cached WQI score
//! - `iot_readings` - sensor ingest (temperature, turbidity, optional pH)
//!
//! # Architecture
//!
//! - `Arc<Mutex<Connection>>` wrapper so one handle can serve concurrent
//!   request handlers; every query takes the lock briefly
//! - Schema applied as one `IF NOT EXISTS` batch on open, followed by
//!   column-presence migrations for databases created by older releases
//!   (see [`schema::migrate`])
//! - Typed query methods returning serializable structs from [`models`]
//! - The WQI score is cached per sample and backfilled lazily: see
//!   [`Database::latest_sample_scored`]
//!
//! # Usage
//!
//! ```rust
//! use wqi_db::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! let id = db.insert_location(22.57, 88.36, Some("Hooghly ghat")).unwrap();
//! assert_eq!(db.list_locations().unwrap().len(), 1);
//! assert!(db.delete_location(id).unwrap());
//! ```

pub mod models;
mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// SQLite database holding locations, water samples and IoT readings.
///
/// Cheaply cloneable; clones share the same underlying connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a file-backed database with the schema applied
    /// and any pending column migrations run.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory database, used by tests.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(schema::create_schema())?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-query;
        // the connection itself is still usable.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_creates_successfully() {
        assert!(Database::open_in_memory().is_ok());
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::open_in_memory().unwrap();
        let db2 = db.clone();
        db.insert_location(22.57, 88.36, None).unwrap();
        assert_eq!(
            db2.list_locations().unwrap().len(),
            1,
            "clone should see same data via shared connection"
        );
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_locations().unwrap().is_empty());
        assert!(db.latest_iot_reading().unwrap().is_none());
    }
}
