//! Location endpoints: map markers, data-page rows, CRUD, and the
//! nearest-site score lookup.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wqi_core::geo::haversine_km;
use wqi_core::reference;

pub(crate) fn parse_coord(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

#[derive(Deserialize)]
pub struct LocationForm {
    pub name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// POST /data/location - create a monitoring point.
pub async fn create_location(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LocationForm>,
) -> Result<Json<Value>, ApiError> {
    let (Some(latitude), Some(longitude)) = (
        parse_coord(form.latitude.as_deref()),
        parse_coord(form.longitude.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Invalid latitude/longitude"));
    };
    let name = form
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let id = state.db.insert_location(latitude, longitude, name)?;
    log::info!("created location {id} at ({latitude}, {longitude})");
    Ok(Json(json!({ "status": "ok", "location_id": id })))
}

/// POST /data/location/:id/delete - remove a point and its samples.
pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.db.delete_location(id)? {
        return Err(ApiError::not_found("Unknown location"));
    }
    Ok(Json(json!({ "status": "ok" })))
}

/// GET /api/locations - markers for the map: user locations with their
/// latest (lazily scored) sample, followed by the static reference sites.
pub async fn api_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let mut output = Vec::new();

    for location in state.db.list_locations()? {
        let sample = state.db.latest_sample_scored(location.id, &state.profile)?;
        let wqi = sample.as_ref().and_then(|s| s.wqi);
        let (status, color) = state.scale.classify(wqi);
        output.push(json!({
            "name": location.name,
            "latitude": location.latitude,
            "longitude": location.longitude,
            "wqi": wqi,
            "status": status,
            "color": color,
        }));
    }

    // Reference sites derive status/color from their stored WQI so the
    // legend stays consistent with user data.
    for site in reference::west_bengal_sites() {
        let (status, color) = state.scale.classify(Some(site.wqi));
        output.push(json!({
            "name": site.display_name(),
            "latitude": site.latitude,
            "longitude": site.longitude,
            "wqi": site.wqi,
            "status": status,
            "color": color,
        }));
    }

    Ok(Json(output))
}

/// GET /api/data - detailed rows for the data page: per-location latest
/// sample with all parameter columns, plus the reference sites.
pub async fn api_data(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>, ApiError> {
    let mut rows = Vec::new();

    for location in state.db.list_locations()? {
        let sample = state.db.latest_sample_scored(location.id, &state.profile)?;
        let wqi = sample.as_ref().and_then(|s| s.wqi);
        let (status, color) = state.scale.classify(wqi);
        rows.push(json!({
            "name": location.name.as_deref().unwrap_or("Unnamed"),
            "latitude": location.latitude,
            "longitude": location.longitude,
            "wqi": wqi,
            "status": status,
            "color": color,
            "location_id": location.id,
            "sample_id": sample.as_ref().map(|s| s.id),
            "timestamp": sample.as_ref().map(|s| s.timestamp.clone()),
            "ph": sample.as_ref().and_then(|s| s.ph),
            "do": sample.as_ref().and_then(|s| s.dissolved_oxygen),
            "tds": sample.as_ref().and_then(|s| s.tds),
            "turbidity": sample.as_ref().and_then(|s| s.turbidity),
            "nitrate": sample.as_ref().and_then(|s| s.nitrate),
            "temperature": sample.as_ref().and_then(|s| s.temperature),
            "reference": false,
        }));
    }

    for site in reference::west_bengal_sites() {
        let (status, color) = state.scale.classify(Some(site.wqi));
        rows.push(json!({
            "name": site.display_name(),
            "latitude": site.latitude,
            "longitude": site.longitude,
            "wqi": site.wqi,
            "status": status,
            "color": color,
            "category": site.category,
            "reference": true,
        }));
    }

    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct NearestQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// GET /api/wqi?lat=&lng= - latest score at the nearest user location.
pub async fn nearest_wqi(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(lat), Some(lng)) = (
        parse_coord(query.lat.as_deref()),
        parse_coord(query.lng.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Invalid or missing lat/lng"));
    };

    let locations = state.db.list_locations()?;
    let Some(nearest) = locations.into_iter().min_by(|a, b| {
        haversine_km(lat, lng, a.latitude, a.longitude)
            .total_cmp(&haversine_km(lat, lng, b.latitude, b.longitude))
    }) else {
        return Err(ApiError::not_found("No locations available"));
    };

    let Some(sample) = state.db.latest_sample_scored(nearest.id, &state.profile)? else {
        return Err(ApiError::not_found("No samples for nearest location"));
    };

    let (status, color) = state.scale.classify(sample.wqi);
    Ok(Json(json!({
        "latitude": nearest.latitude,
        "longitude": nearest.longitude,
        "wqi": sample.wqi,
        "status": status,
        "color": color,
    })))
}

#[cfg(test)]
mod tests {
    use crate::testing::{get, post_form, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn create_location_validates_coordinates() {
        let harness = test_app();
        let (status, body) = post_form(
            harness.app.clone(),
            "/data/location",
            "name=Bad&latitude=north&longitude=88.3",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid latitude/longitude");

        let (status, body) = post_form(
            harness.app,
            "/data/location",
            "name=Ghat&latitude=22.57&longitude=88.36",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["location_id"].is_i64());
    }

    #[tokio::test]
    async fn api_locations_lists_user_points_and_reference_sites() {
        let harness = test_app();
        harness.state.db.insert_location(22.0, 88.0, Some("Ghat")).unwrap();

        let (status, body) = get(harness.app, "/api/locations").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1 + 15);

        // User location has no samples yet.
        assert_eq!(rows[0]["name"], "Ghat");
        assert!(rows[0]["wqi"].is_null());
        assert_eq!(rows[0]["status"], "No Data");

        // Reference sites carry display names and derived statuses.
        let teesta = rows
            .iter()
            .find(|r| r["name"] == "Teesta River (Jalpaiguri)")
            .expect("reference site present");
        assert_eq!(teesta["wqi"], 35.0);
        assert_eq!(teesta["status"], "Good");
        assert_eq!(teesta["color"], "primary");
    }

    #[tokio::test]
    async fn api_locations_backfills_missing_scores() {
        let harness = test_app();
        let location_id = harness.state.db.insert_location(22.0, 88.0, None).unwrap();
        harness
            .state
            .db
            .insert_sample(
                location_id,
                &wqi_db::models::SampleValues {
                    dissolved_oxygen: Some(6.5),
                    ..Default::default()
                },
                None,
            )
            .unwrap();

        let (_, body) = get(harness.app, "/api/locations").await;
        assert_eq!(body[0]["wqi"], 84.38);
        assert_eq!(body[0]["status"], "Very Poor");
    }

    #[tokio::test]
    async fn delete_location_answers_404_for_unknown_id() {
        let harness = test_app();
        let (status, _) = post_form(harness.app.clone(), "/data/location/42/delete", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = harness.state.db.insert_location(22.0, 88.0, None).unwrap();
        let (status, _) =
            post_form(harness.app, &format!("/data/location/{id}/delete"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(harness.state.db.get_location(id).unwrap().is_none());
    }

    #[tokio::test]
    async fn api_data_flags_reference_rows() {
        let harness = test_app();
        let (status, body) = get(harness.app, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 15);
        assert!(rows.iter().all(|r| r["reference"] == true));
    }

    #[tokio::test]
    async fn nearest_wqi_picks_the_closest_location() {
        let harness = test_app();
        let db = &harness.state.db;
        let kolkata = db.insert_location(22.5726, 88.3639, Some("Kolkata")).unwrap();
        let siliguri = db.insert_location(26.7075, 88.43, Some("Siliguri")).unwrap();
        db.insert_sample(kolkata, &Default::default(), Some(12.0)).unwrap();
        db.insert_sample(siliguri, &Default::default(), Some(60.0)).unwrap();

        // Query from Howrah, next to Kolkata.
        let (status, body) = get(harness.app, "/api/wqi?lat=22.59&lng=88.31").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["latitude"], 22.5726);
        assert_eq!(body["wqi"], 12.0);
        assert_eq!(body["status"], "Excellent");
    }

    #[tokio::test]
    async fn nearest_wqi_error_paths() {
        let harness = test_app();

        let (status, _) = get(harness.app.clone(), "/api/wqi?lat=oops&lng=88").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(harness.app.clone(), "/api/wqi?lat=22.5&lng=88.3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No locations available");

        harness.state.db.insert_location(22.0, 88.0, None).unwrap();
        let (status, body) = get(harness.app, "/api/wqi?lat=22.5&lng=88.3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No samples for nearest location");
    }
}
