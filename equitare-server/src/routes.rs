use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::{get, post, put}, Extension, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{self, auth, messages, rides};
use crate::{health_with_pool, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|Extension(state): Extension<Arc<AppState>>| async move {
            health_with_pool(&state.pool).await
        }))
        .route("/api", get(controllers::api_status))
        // auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        // messaggi (tutti protetti)
        .route("/api/messages", get(messages::list_messages).post(messages::send_message))
        .route("/api/messages/conversations", get(messages::list_conversations))
        .route("/api/messages/user/:user_id", get(messages::conversation_with))
        // corse: lettura pubblica, scrittura protetta
        .route("/api/rides", get(rides::list_rides).post(rides::create_ride))
        .route("/api/rides/search", get(rides::search_rides))
        .route(
            "/api/rides/:id",
            get(rides::get_ride).put(rides::update_ride).delete(rides::delete_ride),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// CORS for the browser front end served from `origins`.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true))
}
