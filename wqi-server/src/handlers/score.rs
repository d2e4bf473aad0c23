//! Scoring endpoint and small JSON utility routes.

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use wqi_core::ParameterSet;

/// GET /health - liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /config - map defaults and the color-tag palette the embedded
/// pages use to render markers and badges.
pub async fn ui_config() -> Json<Value> {
    Json(json!({
        "map": {
            "center": { "latitude": 22.5726, "longitude": 88.3639 },
            "zoom": 7,
        },
        "colors": {
            "success": "#198754",
            "primary": "#0d6efd",
            "warning": "#ffc107",
            "danger": "#dc3545",
            "dark": "#212529",
            "secondary": "#6c757d",
        },
    }))
}

/// POST /calculate - score a raw parameter payload without persisting it.
///
/// Unusable values are skipped by the calculator; a payload with nothing
/// usable yields `"wqi": null` and the no-data status.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(readings): Json<ParameterSet>,
) -> Json<Value> {
    let score = wqi_core::compute_score(&readings, &state.profile);
    let (status, color) = state.scale.classify(score);
    Json(json!({ "wqi": score, "status": status, "color": color }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{get, post_json, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn health_answers_ok() {
        let harness = test_app();
        let (status, body) = get(harness.app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn config_exposes_palette_and_map_defaults() {
        let harness = test_app();
        let (status, body) = get(harness.app, "/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["colors"]["success"], "#198754");
        assert!(body["map"]["center"]["latitude"].is_number());
    }

    #[tokio::test]
    async fn calculate_scores_ideal_water_as_excellent() {
        let harness = test_app();
        let (status, body) = post_json(
            harness.app,
            "/calculate",
            json!({
                "ph": 7.0, "do": 14.6, "turbidity": 0.0,
                "tds": 0.0, "nitrate": 0.0, "temperature": 25.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wqi"], 0.0);
        assert_eq!(body["status"], "Excellent");
        assert_eq!(body["color"], "success");
    }

    #[tokio::test]
    async fn calculate_skips_unparseable_values() {
        let harness = test_app();
        let (status, body) = post_json(
            harness.app,
            "/calculate",
            json!({ "ph": "not-a-number", "do": 6.5 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wqi"], 84.38);
        assert_eq!(body["status"], "Very Poor");
    }

    #[tokio::test]
    async fn calculate_with_nothing_usable_is_no_data() {
        let harness = test_app();
        let (status, body) = post_json(
            harness.app,
            "/calculate",
            json!({ "ph": null, "unknown": 12 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["wqi"].is_null());
        assert_eq!(body["status"], "No Data");
        assert_eq!(body["color"], "secondary");
    }

    #[tokio::test]
    async fn calculate_at_standard_is_very_poor() {
        let harness = test_app();
        let (status, body) = post_json(
            harness.app,
            "/calculate",
            json!({ "ph": 8.5, "turbidity": 5.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wqi"], 100.0);
        assert_eq!(body["status"], "Very Poor");
        assert_eq!(body["color"], "danger");
    }
}
