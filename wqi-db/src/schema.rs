//! SQL schema and column-presence migrations.

use rusqlite::Connection;

/// Returns the full SQL schema as a single batch string.
///
/// Timestamps are stored as RFC 3339 UTC strings, which sort
/// lexicographically in chronological order.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS locations (
        id INTEGER PRIMARY KEY,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        name TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_locations_lat ON locations(latitude);
    CREATE INDEX IF NOT EXISTS idx_locations_lng ON locations(longitude);

    CREATE TABLE IF NOT EXISTS water_samples (
        id INTEGER PRIMARY KEY,
        location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
        ph REAL,
        dissolved_oxygen REAL,
        tds REAL,
        turbidity REAL,
        nitrate REAL,
        temperature REAL,
        wqi REAL,
        timestamp TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_samples_location ON water_samples(location_id);
    CREATE INDEX IF NOT EXISTS idx_samples_timestamp ON water_samples(timestamp);
    CREATE INDEX IF NOT EXISTS idx_samples_wqi ON water_samples(wqi);

    CREATE TABLE IF NOT EXISTS iot_readings (
        id INTEGER PRIMARY KEY,
        temperature_c REAL NOT NULL,
        turbidity_percent REAL NOT NULL,
        ph REAL,
        turbidity_ntu REAL,
        timestamp TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_iot_timestamp ON iot_readings(timestamp);
    "#
}

/// Add columns introduced after the first release to databases created by
/// an older schema. `CREATE TABLE IF NOT EXISTS` leaves existing tables
/// untouched, so presence has to be checked per column.
pub fn migrate(conn: &Connection) -> anyhow::Result<()> {
    add_column_if_missing(conn, "water_samples", "temperature", "REAL")?;
    add_column_if_missing(conn, "iot_readings", "ph", "REAL")?;
    add_column_if_missing(conn, "iot_readings", "turbidity_ntu", "REAL")?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    kind: &str,
) -> anyhow::Result<()> {
    if !has_column(conn, table, column)? {
        log::info!("migrating: adding column {column} to {table}");
        conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {kind}"))?;
    }
    Ok(())
}
