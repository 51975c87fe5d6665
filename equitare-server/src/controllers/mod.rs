use axum::Json;
use equitare_core::ApiStatus;

pub mod auth;
pub mod messages;
pub mod rides;

/// Handler per GET /api
pub async fn api_status() -> Json<ApiStatus> {
    Json(ApiStatus {
        message: "API is running...".to_string(),
        status: "OK".to_string(),
    })
}

/// Valore trimmato, oppure `None` se vuoto.
fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
