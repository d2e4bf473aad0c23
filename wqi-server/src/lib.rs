//! Water-quality monitoring web application.
//!
//! Serves the embedded dashboard/map/data pages, the JSON API over the
//! sample store, IoT sensor ingest, CSV export, and the chatbot proxy.
//! Scoring is delegated to `wqi-core` and persistence to `wqi-db`; this
//! crate only translates HTTP payloads in and out of those layers.

pub mod chat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;

/// Build the application router with all routes attached.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Embedded pages
        .route("/", get(handlers::pages::index))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/map", get(handlers::pages::map))
        .route("/sensors", get(handlers::pages::sensors))
        .route("/data", get(handlers::pages::data))
        .route("/chatbot", get(handlers::pages::chatbot))
        // Scoring and utility
        .route("/health", get(handlers::score::health))
        .route("/config", get(handlers::score::ui_config))
        .route("/calculate", post(handlers::score::calculate))
        // Locations and samples
        .route("/api/locations", get(handlers::locations::api_locations))
        .route("/api/data", get(handlers::locations::api_data))
        .route("/api/wqi", get(handlers::locations::nearest_wqi))
        .route("/data/location", post(handlers::locations::create_location))
        .route(
            "/data/location/:id/delete",
            post(handlers::locations::delete_location),
        )
        .route("/data/sample", post(handlers::samples::create_sample))
        .route(
            "/data/sample/:id/update",
            post(handlers::samples::update_sample),
        )
        .route(
            "/data/sample/:id/delete",
            post(handlers::samples::delete_sample),
        )
        // IoT ingest
        .route(
            "/api/iot",
            get(handlers::iot::latest_reading).post(handlers::iot::ingest_reading),
        )
        // Export and chatbot
        .route("/download_csv", get(handlers::export::download_csv))
        .route("/chat", post(handlers::chat::chat))
        .with_state(state)
}
