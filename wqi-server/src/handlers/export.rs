//! CSV export of all monitoring rows (user data plus reference sites).

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;
use wqi_core::reference;

const EXPORT_HEADER: [&str; 13] = [
    "Location Name",
    "Latitude",
    "Longitude",
    "WQI",
    "Status",
    "pH",
    "DO (mg/L)",
    "TDS (mg/L)",
    "Turbidity (NTU)",
    "Nitrate (mg/L)",
    "Temperature (C)",
    "Timestamp",
    "Type",
];

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// GET /download_csv - the full data sheet as an attachment named
/// `water_quality_data_YYYYMMDD.csv`.
pub async fn download_csv(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADER)
        .map_err(anyhow::Error::from)?;

    for location in state.db.list_locations()? {
        let sample = state.db.latest_sample(location.id)?;
        let wqi = sample.as_ref().and_then(|s| s.wqi);
        let (status, _) = state.scale.classify(wqi);
        writer
            .write_record([
                location.name.clone().unwrap_or_default(),
                location.latitude.to_string(),
                location.longitude.to_string(),
                cell(wqi),
                status.to_string(),
                cell(sample.as_ref().and_then(|s| s.ph)),
                cell(sample.as_ref().and_then(|s| s.dissolved_oxygen)),
                cell(sample.as_ref().and_then(|s| s.tds)),
                cell(sample.as_ref().and_then(|s| s.turbidity)),
                cell(sample.as_ref().and_then(|s| s.nitrate)),
                cell(sample.as_ref().and_then(|s| s.temperature)),
                sample.as_ref().map(|s| s.timestamp.clone()).unwrap_or_default(),
                "User Added".to_string(),
            ])
            .map_err(anyhow::Error::from)?;
    }

    for site in reference::west_bengal_sites() {
        let (status, _) = state.scale.classify(Some(site.wqi));
        writer
            .write_record([
                site.export_name(),
                site.latitude.to_string(),
                site.longitude.to_string(),
                site.wqi.to_string(),
                status.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                // The reference survey assumes ambient temperature.
                "25".to_string(),
                String::new(),
                "Static Reference (West Bengal)".to_string(),
            ])
            .map_err(anyhow::Error::from)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("flushing csv export: {err}")))?;
    let filename = format!(
        "water_quality_data_{}.csv",
        chrono::Utc::now().format("%Y%m%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use crate::testing::{get_raw, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn export_contains_user_rows_and_reference_rows() {
        let harness = test_app();
        let db = &harness.state.db;
        let location_id = db.insert_location(22.5, 88.3, Some("Ghat")).unwrap();
        db.insert_sample(
            location_id,
            &wqi_db::models::SampleValues {
                ph: Some(7.2),
                ..Default::default()
            },
            Some(13.33),
        )
        .unwrap();

        let (status, headers, body) = get_raw(harness.app, "/download_csv").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "text/csv");
        let disposition = headers["content-disposition"].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"water_quality_data_"));
        assert!(disposition.ends_with(".csv\""));

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 1 + 1 + 15, "header, one user row, 15 reference rows");
        assert!(lines[0].starts_with("Location Name,Latitude,Longitude,WQI,Status"));
        assert!(lines[1].starts_with("Ghat,22.5,88.3,13.33,Excellent,7.2"));
        assert!(body.contains("Static Reference (West Bengal)"));
        assert!(body.contains("Teesta River - Jalpaiguri"));
    }

    #[tokio::test]
    async fn export_marks_unsampled_locations_as_no_data() {
        let harness = test_app();
        harness.state.db.insert_location(22.5, 88.3, None).unwrap();

        let (_, _, body) = get_raw(harness.app, "/download_csv").await;
        let user_row = body.lines().nth(1).unwrap();
        assert!(user_row.contains("No Data"));
    }
}
