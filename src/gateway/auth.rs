//! Bearer token verification
//!
//! Tokens are issued elsewhere (HS256, shared secret). The middleware only
//! verifies them and injects [`AuthenticatedOwner`] for the wallet handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::state::AppState;
use super::types::{ApiError, error_codes};
use crate::wallet::OwnerId;

/// Access token claims. The owner id is read from `userId`, falling back to
/// the standard `sub`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

impl Claims {
    pub fn owner_id(&self) -> Option<OwnerId> {
        self.user_id
            .as_deref()
            .or(self.sub.as_deref())
            .and_then(|s| s.parse().ok())
    }
}

/// Identity of the caller, inserted into request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedOwner {
    pub owner_id: OwnerId,
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract Authorization header
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "No token provided",
            )
        })?;

    // 2. Verify Token
    let claims = verify_token(state.jwt_secret(), token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        ApiError::new(StatusCode::FORBIDDEN, error_codes::AUTH_FAILED, "Invalid token")
    })?;

    let owner_id = claims.owner_id().ok_or_else(|| {
        ApiError::new(
            StatusCode::FORBIDDEN,
            error_codes::AUTH_FAILED,
            "Invalid token",
        )
    })?;

    // 3. Inject owner
    request
        .extensions_mut()
        .insert(AuthenticatedOwner { owner_id });
    Ok(next.run(request).await)
}
