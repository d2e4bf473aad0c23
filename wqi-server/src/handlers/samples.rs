//! Sample CRUD endpoints.
//!
//! Forms arrive with every field as text; empty fields mean "no reading"
//! on create and "keep the current value" on update. The cached WQI is
//! recomputed on every write.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wqi_db::models::SampleValues;

#[derive(Deserialize)]
pub struct SampleForm {
    pub location_id: Option<String>,
    pub ph: Option<String>,
    #[serde(rename = "do")]
    pub dissolved_oxygen: Option<String>,
    pub tds: Option<String>,
    pub turbidity: Option<String>,
    pub nitrate: Option<String>,
    pub temperature: Option<String>,
}

fn parse_optional(name: &str, raw: &Option<String>) -> Result<Option<f64>, ApiError> {
    let Some(raw) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| ApiError::bad_request(format!("Invalid '{name}'")))
}

impl SampleForm {
    fn values(&self) -> Result<SampleValues, ApiError> {
        Ok(SampleValues {
            ph: parse_optional("ph", &self.ph)?,
            dissolved_oxygen: parse_optional("do", &self.dissolved_oxygen)?,
            tds: parse_optional("tds", &self.tds)?,
            turbidity: parse_optional("turbidity", &self.turbidity)?,
            nitrate: parse_optional("nitrate", &self.nitrate)?,
            temperature: parse_optional("temperature", &self.temperature)?,
        })
    }
}

/// POST /data/sample - record a sample; the WQI is computed at insert.
pub async fn create_sample(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SampleForm>,
) -> Result<Json<Value>, ApiError> {
    let location_id = form
        .location_id
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::bad_request("Invalid location"))?;
    if state.db.get_location(location_id)?.is_none() {
        return Err(ApiError::not_found("Unknown location"));
    }

    let values = form.values()?;
    let wqi = wqi_core::compute_score(&values.readings(), &state.profile);
    let sample = state.db.insert_sample(location_id, &values, wqi)?;
    Ok(Json(json!({ "status": "ok", "sample_id": sample.id })))
}

/// POST /data/sample/:id/update - partial update; empty fields keep their
/// current values, then the WQI is recomputed from the merged readings.
pub async fn update_sample(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<SampleForm>,
) -> Result<Json<Value>, ApiError> {
    let Some(current) = state.db.get_sample(id)? else {
        return Err(ApiError::not_found("Unknown sample"));
    };

    let incoming = form.values()?;
    let merged = SampleValues {
        ph: incoming.ph.or(current.ph),
        dissolved_oxygen: incoming.dissolved_oxygen.or(current.dissolved_oxygen),
        tds: incoming.tds.or(current.tds),
        turbidity: incoming.turbidity.or(current.turbidity),
        nitrate: incoming.nitrate.or(current.nitrate),
        temperature: incoming.temperature.or(current.temperature),
    };
    let wqi = wqi_core::compute_score(&merged.readings(), &state.profile);
    state.db.update_sample(id, &merged, wqi)?;
    Ok(Json(json!({ "status": "ok" })))
}

/// POST /data/sample/:id/delete
pub async fn delete_sample(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.db.delete_sample(id)? {
        return Err(ApiError::not_found("Unknown sample"));
    }
    Ok(Json(json!({ "status": "ok" })))
}
