//! Access guard: bearer token -> verified subject -> current identity.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use equitare_core::User;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: i64,
    pub exp: i64,
}

/// Esito di una verifica di firma andata a buon fine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub expires_at: OffsetDateTime,
}

/// Checks a token's signature and extracts its subject and expiry.
///
/// Implementations return [`AppError::InvalidCredential`] for anything they
/// cannot vouch for.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedToken, AppError>;
}

/// Lookup of the identity a token was issued to.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, user_id: &str) -> Result<Option<User>, AppError>;
}

/// HS256 keys shared by token issuing and verification.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    /// Token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user_id: &str, issued_at: OffsetDateTime) -> Result<String, AppError> {
        let expires_at = issued_at
            .checked_add(self.ttl)
            .ok_or(AppError::Internal("token expiry out of range"))?;
        let claims = Claims {
            sub: user_id.to_owned(),
            iat: issued_at.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AppError::Token)
    }
}

impl TokenVerifier for JwtKeys {
    fn verify(&self, token: &str) -> Result<VerifiedToken, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AppError::InvalidCredential
            })?
            .claims;
        let expires_at =
            OffsetDateTime::from_unix_timestamp(claims.exp).map_err(|_| AppError::InvalidCredential)?;
        Ok(VerifiedToken { subject: claims.sub, expires_at })
    }
}

/// Validates a bearer credential and resolves it to the current identity.
#[derive(Clone)]
pub struct AccessGuard {
    verifier: Arc<dyn TokenVerifier>,
    identities: Arc<dyn IdentityStore>,
}

impl AccessGuard {
    pub fn new(verifier: Arc<dyn TokenVerifier>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { verifier, identities }
    }

    /// `authorization` is the raw header value, if any.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<User, AppError> {
        let token = bearer_token(authorization)?;
        let verified = self.verifier.verify(token)?;
        if verified.expires_at <= OffsetDateTime::now_utc() {
            return Err(AppError::InvalidCredential);
        }
        match self.identities.find_identity(&verified.subject).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(subject = %verified.subject, "token for unknown user");
                Err(AppError::UnknownSubject)
            }
        }
    }
}

/// Extracts `<token>` from `Bearer <token>`.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AppError> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingCredential)
}

/// Utente autenticato della richiesta corrente.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<Arc<AppState>>()
            .cloned()
            .ok_or(AppError::Internal("application state not installed"))?;
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        state.guard.authenticate(header).await.map(CurrentUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_the_scheme_and_a_value() {
        assert_eq!(bearer_token(Some("Bearer abc")).ok(), Some("abc"));
        assert!(matches!(bearer_token(None), Err(AppError::MissingCredential)));
        assert!(matches!(bearer_token(Some("Basic abc")), Err(AppError::MissingCredential)));
        assert!(matches!(bearer_token(Some("Bearer ")), Err(AppError::MissingCredential)));
        assert!(matches!(bearer_token(Some("abc")), Err(AppError::MissingCredential)));
    }

    #[test]
    fn issued_token_verifies_with_same_secret_only() {
        let keys = JwtKeys::new(b"secret-one", Duration::days(7));
        let token = keys.issue("user-1").expect("issue");

        let verified = keys.verify(&token).expect("verify");
        assert_eq!(verified.subject, "user-1");
        assert!(verified.expires_at > OffsetDateTime::now_utc());

        let other = JwtKeys::new(b"secret-two", Duration::days(7));
        assert!(matches!(other.verify(&token), Err(AppError::InvalidCredential)));
    }

    #[test]
    fn expired_and_garbage_tokens_are_invalid() {
        let keys = JwtKeys::new(b"secret", Duration::days(7));
        let stale = keys
            .issue_at("user-1", OffsetDateTime::now_utc() - Duration::days(8))
            .expect("issue");
        assert!(matches!(keys.verify(&stale), Err(AppError::InvalidCredential)));
        assert!(matches!(keys.verify("not.a.jwt"), Err(AppError::InvalidCredential)));
    }

    #[test]
    fn expiry_overflow_is_an_error_not_a_panic() {
        let keys = JwtKeys::new(b"secret", Duration::MAX);
        assert!(matches!(keys.issue("user-1"), Err(AppError::Internal(_))));
    }
}
