//! IoT sensor ingest and latest-reading endpoints.
//!
//! Sensors post JSON with numbers or numeric strings. Turbidity may
//! arrive under `turbidity` or `turbidity_ntu` (NTU) or
//! `turbidity_percent` (raw sensor %); at least one is required, and the
//! percent column mirrors the NTU value when only NTU was sent. Every
//! accepted reading is also appended to `<data-dir>/iot.csv`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wqi_core::{coerce_number, round2};
use wqi_db::models::IotReading;

#[derive(Deserialize, Default)]
pub struct IotPayload {
    pub temperature_c: Option<Value>,
    pub ph: Option<Value>,
    pub turbidity: Option<Value>,
    pub turbidity_ntu: Option<Value>,
    pub turbidity_percent: Option<Value>,
}

/// A field that is absent stays `None`; one that is present but not
/// numeric is a 400, since the sensor clearly meant to send something.
fn optional_number(raw: &Option<Value>, name: &str) -> Result<Option<f64>, ApiError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_number(value)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid '{name}'"))),
    }
}

/// POST /api/iot - ingest one sensor reading.
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IotPayload>,
) -> Result<Json<Value>, ApiError> {
    let temperature_c = optional_number(&payload.temperature_c, "temperature_c")?
        .ok_or_else(|| ApiError::bad_request("Missing or invalid 'temperature_c'"))?;
    let ph = optional_number(&payload.ph, "ph")?;

    let turbidity_ntu = match optional_number(&payload.turbidity, "turbidity")? {
        Some(value) => Some(value),
        None => optional_number(&payload.turbidity_ntu, "turbidity_ntu")?,
    };
    let turbidity_percent = optional_number(&payload.turbidity_percent, "turbidity_percent")?;
    let Some(turbidity_percent) = turbidity_percent.or(turbidity_ntu) else {
        return Err(ApiError::bad_request(
            "Provide 'turbidity' (or 'turbidity_ntu') or 'turbidity_percent'",
        ));
    };

    let reading = state
        .db
        .insert_iot_reading(temperature_c, turbidity_percent, ph, turbidity_ntu)?;
    append_log(&state, &reading)?;
    log::info!("ingested iot reading {}", reading.id);

    Ok(Json(json!({
        "status": "ok",
        "id": reading.id,
        "timestamp": reading.timestamp,
    })))
}

/// GET /api/iot - the latest reading, values rounded to two decimals.
/// NTU turbidity is preferred over the raw percent when both exist.
pub async fn latest_reading(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let Some(reading) = state.db.latest_iot_reading()? else {
        return Err(ApiError::not_found("No data"));
    };
    let turbidity = reading.turbidity_ntu.unwrap_or(reading.turbidity_percent);
    let mut payload = json!({
        "temperature_c": round2(reading.temperature_c),
        "turbidity": round2(turbidity),
        "timestamp": reading.timestamp,
    });
    if let Some(ph) = reading.ph {
        payload["ph"] = json!(round2(ph));
    }
    Ok(Json(payload))
}

fn append_log(state: &AppState, reading: &IotReading) -> anyhow::Result<()> {
    let path = state.data_dir.join("iot.csv");
    let _guard = state
        .iot_log
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let write_header = !path.exists();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if write_header {
        writer.write_record([
            "id",
            "temperature_c",
            "ph",
            "turbidity_percent",
            "turbidity_ntu",
            "timestamp",
        ])?;
    }
    writer.write_record([
        reading.id.to_string(),
        reading.temperature_c.to_string(),
        reading.ph.map(|v| v.to_string()).unwrap_or_default(),
        reading.turbidity_percent.to_string(),
        reading.turbidity_ntu.map(|v| v.to_string()).unwrap_or_default(),
        reading.timestamp.clone(),
    ])?;
    writer.flush()?;
    Ok(())
}
