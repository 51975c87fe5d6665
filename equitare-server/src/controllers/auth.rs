use axum::{extract::Extension, http::StatusCode, Json};
use equitare_core::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserSummary};
use std::sync::Arc;

use super::non_blank;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::store::{NewUser, UserStore};
use crate::AppState;

/// Handler per POST /api/auth/register
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (Some(name), Some(email), Some(university)) =
        (non_blank(&req.name), non_blank(&req.email), non_blank(&req.university))
    else {
        return Err(AppError::validation("Please enter all fields"));
    };
    if req.password.is_empty() {
        return Err(AppError::validation("Please enter all fields"));
    }
    let email = email.to_lowercase();
    if !looks_like_email(&email) {
        return Err(AppError::validation("Please enter a valid email address"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let users = UserStore::new(&state.pool);
    if users.email_taken(&email).await? {
        return Err(AppError::validation("User already exists"));
    }

    let password_hash = hash_password(&req.password).map_err(AppError::PasswordHash)?;
    let user = users
        .insert(NewUser { name, email: &email, university, password_hash: &password_hash })
        .await?;
    let token = state.tokens.issue(&user.id)?;
    tracing::info!(user_id = %user.id, "user registered");

    let resp = AuthResponse { token, user: UserSummary::from(&user) };
    Ok((StatusCode::CREATED, Json(resp)))
}

/// Handler per POST /api/auth/login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let Some(email) = non_blank(&req.email) else {
        return Err(AppError::validation("Please enter all fields"));
    };
    if req.password.is_empty() {
        return Err(AppError::validation("Please enter all fields"));
    }

    // utente sconosciuto e password errata danno la stessa risposta
    let found = UserStore::new(&state.pool).find_credentials(&email.to_lowercase()).await?;
    let user = match found {
        Some((user, stored_hash)) => {
            if !verify_password(&req.password, &stored_hash).map_err(AppError::PasswordHash)? {
                return Err(AppError::validation("Invalid credentials"));
            }
            user
        }
        None => return Err(AppError::validation("Invalid credentials")),
    };

    let token = state.tokens.issue(&user.id)?;
    Ok(Json(AuthResponse { token, user: UserSummary::from(&user) }))
}

/// Handler per GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Handler per PUT /api/auth/profile
pub async fn update_profile(
    CurrentUser(user): CurrentUser,
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let name = optional_field(req.name.as_deref(), "name")?;
    let university = optional_field(req.university.as_deref(), "university")?;

    let updated = UserStore::new(&state.pool)
        .update_profile(&user.id, name, university)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(updated))
}

/// A field that may be omitted but, when sent, must not be blank.
fn optional_field<'a>(value: Option<&'a str>, field: &str) -> Result<Option<&'a str>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => non_blank(raw)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("{field} must not be empty"))),
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}
