//! Bearer token extractor for the backup endpoints
//!
//! Backups carry a whole user's state, so the backup and restore routes
//! require `Authorization: Bearer <sync.backup_token>`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

/// Proof that the request presented the configured backup token
#[derive(Debug, Clone, Copy)]
pub struct BackupAuth;

/// Compare without short-circuiting on the first differing byte
fn token_matches(presented: &str, expected: &SecretString) -> bool {
    let expected = expected.expose_secret().as_bytes();
    let presented = presented.as_bytes();
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for BackupAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        if !token_matches(token, app_state.backup_token()) {
            warn!(path = %parts.uri.path(), "Rejected backup request with invalid token");
            return Err(ApiError::Unauthorized("Invalid backup token".to_string()));
        }

        Ok(BackupAuth)
    }
}
