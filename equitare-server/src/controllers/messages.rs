use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use equitare_core::{derive_conversations, utils::ids::is_valid_id, ConversationSummary, Message, SendMessageRequest};
use std::sync::Arc;

use super::non_blank;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::store::{MessageStore, RideStore, UserStore};
use crate::AppState;

/// Handler per GET /api/messages
pub async fn list_messages(
    CurrentUser(user): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = MessageStore::new(&state.pool).involving(&user.id).await?;
    Ok(Json(messages))
}

/// Handler per GET /api/messages/conversations
pub async fn list_conversations(
    CurrentUser(user): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let messages = MessageStore::new(&state.pool).involving(&user.id).await?;
    Ok(Json(derive_conversations(&user.id, &messages)))
}

/// Handler per GET /api/messages/user/:user_id
pub async fn conversation_with(
    CurrentUser(user): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
    Path(other_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    if !is_valid_id(&other_id) {
        return Err(AppError::validation("Invalid user ID"));
    }
    if UserStore::new(&state.pool).find_by_id(&other_id).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    let messages = MessageStore::new(&state.pool).between(&user.id, &other_id).await?;
    Ok(Json(messages))
}

/// Handler per POST /api/messages
pub async fn send_message(
    CurrentUser(sender): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    // tutta la validazione avviene prima di toccare lo store
    let (Some(recipient_id), Some(content)) = (non_blank(&req.recipient_id), non_blank(&req.content)) else {
        return Err(AppError::validation("Recipient and message content are required"));
    };
    if !is_valid_id(recipient_id) {
        return Err(AppError::validation("Invalid recipient ID"));
    }
    let ride_id = req.ride_id.as_deref().and_then(non_blank);
    if let Some(ride_id) = ride_id {
        if !is_valid_id(ride_id) {
            return Err(AppError::validation("Invalid ride ID"));
        }
    }

    let recipient = UserStore::new(&state.pool)
        .find_by_id(recipient_id)
        .await?
        .ok_or(AppError::NotFound("recipient"))?;
    let ride = match ride_id {
        Some(ride_id) => Some(RideStore::new(&state.pool).get(ride_id).await?.ok_or(AppError::NotFound("ride"))?),
        None => None,
    };

    let message = MessageStore::new(&state.pool)
        .insert(&sender, &recipient, content, ride.as_ref())
        .await?;
    tracing::info!(message_id = %message.id, from = %sender.id, to = %recipient.id, "message sent");
    Ok((StatusCode::CREATED, Json(message)))
}
