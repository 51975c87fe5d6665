use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use equitare_core::Error as ApiError;

/// Errore tipizzato dei controller, convertito in status HTTP + envelope JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no token, authorization denied")]
    MissingCredential,
    #[error("token is not valid")]
    InvalidCredential,
    #[error("user not found")]
    UnknownSubject,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("store failure: {0}")]
    Store(#[from] sqlx::Error),
    #[error("could not issue token: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[source] bcrypt::BcryptError),
    #[error("{0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential | AppError::InvalidCredential | AppError::UnknownSubject => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Store(_) | AppError::Token(_) | AppError::PasswordHash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "missing_credential",
            AppError::InvalidCredential => "invalid_credential",
            AppError::UnknownSubject => "unknown_subject",
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::Store(_) => "store_failure",
            AppError::Token(_) | AppError::PasswordHash(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            // i dettagli interni restano nei log
            AppError::Store(_) | AppError::Token(_) | AppError::PasswordHash(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(ApiError::new(self.code(), message))).into_response()
    }
}

// body o query malformati sono errori di validazione del client
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
