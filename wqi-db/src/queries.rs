//! Typed query methods for locations, water samples and IoT readings.
//!
//! "Latest" lookups order by timestamp descending with the row id as a
//! tie-breaker, since two inserts within the same instant produce equal
//! RFC 3339 strings.

use crate::models::{IotReading, Location, SampleValues, WaterSample};
use crate::Database;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use wqi_core::Profile;

fn location_from_row(row: &Row) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
        name: row.get(3)?,
    })
}

fn sample_from_row(row: &Row) -> rusqlite::Result<WaterSample> {
    Ok(WaterSample {
        id: row.get(0)?,
        location_id: row.get(1)?,
        ph: row.get(2)?,
        dissolved_oxygen: row.get(3)?,
        tds: row.get(4)?,
        turbidity: row.get(5)?,
        nitrate: row.get(6)?,
        temperature: row.get(7)?,
        wqi: row.get(8)?,
        timestamp: row.get(9)?,
    })
}

const SAMPLE_COLUMNS: &str = "id, location_id, ph, dissolved_oxygen, tds, turbidity, nitrate, temperature, wqi, timestamp";

impl Database {
    // ───────────────────── Locations ─────────────────────

    pub fn insert_location(
        &self,
        latitude: f64,
        longitude: f64,
        name: Option<&str>,
    ) -> anyhow::Result<i64> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO locations (latitude, longitude, name) VALUES (?1, ?2, ?3)",
            params![latitude, longitude, name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_locations(&self) -> anyhow::Result<Vec<Location>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare("SELECT id, latitude, longitude, name FROM locations ORDER BY id")?;
        let rows = stmt
            .query_map([], location_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: list_locations returned {} rows", rows.len());
        Ok(rows)
    }

    pub fn get_location(&self, id: i64) -> anyhow::Result<Option<Location>> {
        let conn = self.lock();
        let location = conn
            .query_row(
                "SELECT id, latitude, longitude, name FROM locations WHERE id = ?1",
                params![id],
                location_from_row,
            )
            .optional()?;
        Ok(location)
    }

    /// Delete a location; its samples cascade. `false` when unknown.
    pub fn delete_location(&self, id: i64) -> anyhow::Result<bool> {
        let deleted = self
            .lock()
            .execute("DELETE FROM locations WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ───────────────────── Water samples ─────────────────────

    /// Insert a sample with a pre-computed score, stamped with the
    /// current UTC time. Returns the stored row.
    pub fn insert_sample(
        &self,
        location_id: i64,
        values: &SampleValues,
        wqi: Option<f64>,
    ) -> anyhow::Result<WaterSample> {
        let timestamp = Utc::now().to_rfc3339();
        let conn = self.lock();
        conn.execute(
            "INSERT INTO water_samples
                (location_id, ph, dissolved_oxygen, tds, turbidity, nitrate, temperature, wqi, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                location_id,
                values.ph,
                values.dissolved_oxygen,
                values.tds,
                values.turbidity,
                values.nitrate,
                values.temperature,
                wqi,
                timestamp
            ],
        )?;
        Ok(WaterSample {
            id: conn.last_insert_rowid(),
            location_id,
            ph: values.ph,
            dissolved_oxygen: values.dissolved_oxygen,
            tds: values.tds,
            turbidity: values.turbidity,
            nitrate: values.nitrate,
            temperature: values.temperature,
            wqi,
            timestamp,
        })
    }

    pub fn get_sample(&self, id: i64) -> anyhow::Result<Option<WaterSample>> {
        let conn = self.lock();
        let sample = conn
            .query_row(
                &format!("SELECT {SAMPLE_COLUMNS} FROM water_samples WHERE id = ?1"),
                params![id],
                sample_from_row,
            )
            .optional()?;
        Ok(sample)
    }

    /// Overwrite a sample's parameter columns and cached score, keeping
    /// its original timestamp. `false` when unknown.
    pub fn update_sample(
        &self,
        id: i64,
        values: &SampleValues,
        wqi: Option<f64>,
    ) -> anyhow::Result<bool> {
        let updated = self.lock().execute(
            "UPDATE water_samples
             SET ph = ?1, dissolved_oxygen = ?2, tds = ?3, turbidity = ?4,
                 nitrate = ?5, temperature = ?6, wqi = ?7
             WHERE id = ?8",
            params![
                values.ph,
                values.dissolved_oxygen,
                values.tds,
                values.turbidity,
                values.nitrate,
                values.temperature,
                wqi,
                id
            ],
        )?;
        Ok(updated > 0)
    }

    pub fn delete_sample(&self, id: i64) -> anyhow::Result<bool> {
        let deleted = self
            .lock()
            .execute("DELETE FROM water_samples WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// The most recent sample for a location, as stored.
    pub fn latest_sample(&self, location_id: i64) -> anyhow::Result<Option<WaterSample>> {
        let conn = self.lock();
        let sample = conn
            .query_row(
                &format!(
                    "SELECT {SAMPLE_COLUMNS} FROM water_samples
                     WHERE location_id = ?1
                     ORDER BY timestamp DESC, id DESC
                     LIMIT 1"
                ),
                params![location_id],
                sample_from_row,
            )
            .optional()?;
        Ok(sample)
    }

    pub fn set_sample_wqi(&self, id: i64, wqi: f64) -> anyhow::Result<()> {
        self.lock().execute(
            "UPDATE water_samples SET wqi = ?1 WHERE id = ?2",
            params![wqi, id],
        )?;
        Ok(())
    }

    /// The most recent sample for a location with its WQI backfilled:
    /// when the stored score is NULL, compute it from the stored readings
    /// and persist it before returning. A sample whose readings yield no
    /// score (all columns NULL) stays unscored.
    pub fn latest_sample_scored(
        &self,
        location_id: i64,
        profile: &Profile,
    ) -> anyhow::Result<Option<WaterSample>> {
        let Some(mut sample) = self.latest_sample(location_id)? else {
            return Ok(None);
        };
        if sample.wqi.is_none() {
            if let Some(score) = wqi_core::compute_score(&sample.readings(), profile) {
                log::debug!("backfilling wqi {score} for sample {}", sample.id);
                self.set_sample_wqi(sample.id, score)?;
                sample.wqi = Some(score);
            }
        }
        Ok(Some(sample))
    }

    // ───────────────────── IoT readings ─────────────────────

    /// Insert a sensor reading stamped with the current UTC time and
    /// return the stored row.
    pub fn insert_iot_reading(
        &self,
        temperature_c: f64,
        turbidity_percent: f64,
        ph: Option<f64>,
        turbidity_ntu: Option<f64>,
    ) -> anyhow::Result<IotReading> {
        let timestamp = Utc::now().to_rfc3339();
        let conn = self.lock();
        conn.execute(
            "INSERT INTO iot_readings (temperature_c, turbidity_percent, ph, turbidity_ntu, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![temperature_c, turbidity_percent, ph, turbidity_ntu, timestamp],
        )?;
        Ok(IotReading {
            id: conn.last_insert_rowid(),
            temperature_c,
            turbidity_percent,
            ph,
            turbidity_ntu,
            timestamp,
        })
    }

    pub fn latest_iot_reading(&self) -> anyhow::Result<Option<IotReading>> {
        let conn = self.lock();
        let reading = conn
            .query_row(
                "SELECT id, temperature_c, turbidity_percent, ph, turbidity_ntu, timestamp
                 FROM iot_readings
                 ORDER BY timestamp DESC, id DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok(IotReading {
                        id: row.get(0)?,
                        temperature_c: row.get(1)?,
                        turbidity_percent: row.get(2)?,
                        ph: row.get(3)?,
                        turbidity_ntu: row.get(4)?,
                        timestamp: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wqi_core::Profile;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn location_round_trip() {
        let db = db();
        let id = db.insert_location(22.57, 88.36, Some("Hooghly ghat")).unwrap();
        let loaded = db.get_location(id).unwrap().unwrap();
        assert_eq!(loaded.name.as_deref(), Some("Hooghly ghat"));
        assert_eq!(loaded.latitude, 22.57);

        assert!(db.delete_location(id).unwrap());
        assert!(!db.delete_location(id).unwrap(), "second delete is a no-op");
        assert!(db.get_location(id).unwrap().is_none());
    }

    #[test]
    fn deleting_a_location_cascades_to_samples() {
        let db = db();
        let location_id = db.insert_location(22.0, 88.0, None).unwrap();
        let sample = db
            .insert_sample(
                location_id,
                &SampleValues {
                    ph: Some(7.4),
                    ..SampleValues::default()
                },
                Some(20.0),
            )
            .unwrap();

        assert!(db.delete_location(location_id).unwrap());
        assert!(db.get_sample(sample.id).unwrap().is_none());
    }

    #[test]
    fn latest_sample_prefers_newest_row() {
        let db = db();
        let location_id = db.insert_location(22.0, 88.0, None).unwrap();
        let values = SampleValues::default();
        db.insert_sample(location_id, &values, Some(10.0)).unwrap();
        let second = db.insert_sample(location_id, &values, Some(30.0)).unwrap();

        // Timestamps may be identical; the id tie-breaker picks the newer.
        let latest = db.latest_sample(location_id).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.wqi, Some(30.0));
    }

    #[test]
    fn update_sample_overwrites_columns() {
        let db = db();
        let location_id = db.insert_location(22.0, 88.0, None).unwrap();
        let sample = db
            .insert_sample(
                location_id,
                &SampleValues {
                    ph: Some(7.0),
                    tds: Some(100.0),
                    ..SampleValues::default()
                },
                Some(5.0),
            )
            .unwrap();

        let updated = SampleValues {
            ph: Some(8.0),
            tds: Some(100.0),
            ..SampleValues::default()
        };
        assert!(db.update_sample(sample.id, &updated, Some(40.0)).unwrap());
        let loaded = db.get_sample(sample.id).unwrap().unwrap();
        assert_eq!(loaded.ph, Some(8.0));
        assert_eq!(loaded.wqi, Some(40.0));
        assert_eq!(loaded.timestamp, sample.timestamp, "timestamp is kept");

        assert!(!db.update_sample(9999, &updated, None).unwrap());
    }

    #[test]
    fn backfill_computes_and_persists_missing_score() {
        let db = db();
        let profile = Profile::default();
        let location_id = db.insert_location(22.0, 88.0, None).unwrap();
        // Stored without a score, as if written before scoring existed.
        let sample = db
            .insert_sample(
                location_id,
                &SampleValues {
                    dissolved_oxygen: Some(6.5),
                    ..SampleValues::default()
                },
                None,
            )
            .unwrap();

        let scored = db
            .latest_sample_scored(location_id, &profile)
            .unwrap()
            .unwrap();
        assert_eq!(scored.wqi, Some(84.38));

        // The score was persisted, not just returned.
        let reloaded = db.get_sample(sample.id).unwrap().unwrap();
        assert_eq!(reloaded.wqi, Some(84.38));
    }

    #[test]
    fn backfill_leaves_empty_samples_unscored() {
        let db = db();
        let location_id = db.insert_location(22.0, 88.0, None).unwrap();
        db.insert_sample(location_id, &SampleValues::default(), None)
            .unwrap();

        let scored = db
            .latest_sample_scored(location_id, &Profile::default())
            .unwrap()
            .unwrap();
        assert_eq!(scored.wqi, None, "no readings means no score");
    }

    #[test]
    fn latest_sample_scored_handles_missing_location() {
        let db = db();
        assert!(db
            .latest_sample_scored(42, &Profile::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn iot_reading_round_trip() {
        let db = db();
        let first = db
            .insert_iot_reading(24.5, 80.0, Some(7.1), Some(3.2))
            .unwrap();
        let second = db.insert_iot_reading(25.0, 75.0, None, None).unwrap();
        assert!(second.id > first.id);

        let latest = db.latest_iot_reading().unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.temperature_c, 25.0);
        assert_eq!(latest.ph, None);
    }
}
