//! Embedded HTML pages.
//!
//! Pages are compiled into the binary with `include_str!` so the server
//! ships as a single executable; each page fetches its data from the JSON
//! API client-side.

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../pages/index.html"))
}

pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../../pages/dashboard.html"))
}

pub async fn map() -> Html<&'static str> {
    Html(include_str!("../../pages/map.html"))
}

pub async fn sensors() -> Html<&'static str> {
    Html(include_str!("../../pages/sensors.html"))
}

pub async fn data() -> Html<&'static str> {
    Html(include_str!("../../pages/data.html"))
}

pub async fn chatbot() -> Html<&'static str> {
    Html(include_str!("../../pages/chatbot.html"))
}

#[cfg(test)]
mod tests {
    use crate::testing::{get_raw, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn all_pages_serve_html() {
        let harness = test_app();
        for uri in ["/", "/dashboard", "/map", "/sensors", "/data", "/chatbot"] {
            let (status, headers, body) = get_raw(harness.app.clone(), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            let content_type = headers["content-type"].to_str().unwrap();
            assert!(content_type.starts_with("text/html"), "{uri}");
            assert!(body.contains("<html"), "{uri} should be a full page");
        }
    }
}
