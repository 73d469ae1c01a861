use axum::{http::header, response::IntoResponse};

pub const ENDPOINTS_JSON: &str = include_str!("endpoints.json");

/// `GET /api`: static description of every endpoint.
pub async fn describe() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], ENDPOINTS_JSON)
}
