//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError` / `ApiResult<T>`: Handler error plumbing
//! - `error_codes`: Standard error code constants

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::transfer::TransferError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self::with_msg("ok", data)
    }

    /// Success with a custom message
    pub fn with_msg(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: msg.into(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Handler errors
// ============================================================================

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 with `msg = "ok"`
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match &e {
            TransferError::InsufficientBalance => {
                Self::new(status, error_codes::INSUFFICIENT_BALANCE, e.to_string())
            }
            TransferError::WalletNotFound => {
                Self::new(status, error_codes::WALLET_NOT_FOUND, e.to_string())
            }
            TransferError::RecipientNotFound | TransferError::RecipientWalletNotFound => {
                Self::new(status, error_codes::RECIPIENT_NOT_FOUND, e.to_string())
            }
            TransferError::IdempotencyKeyConflict(_) => {
                Self::new(status, error_codes::IDEMPOTENCY_CONFLICT, e.to_string())
            }
            TransferError::StoreUnavailable(detail) => {
                tracing::warn!(code = e.code(), %detail, "Transfer store unavailable");
                Self::service_unavailable("Service temporarily unavailable, retry later")
            }
            TransferError::Internal(detail) => {
                tracing::error!(code = e.code(), %detail, "Transfer internal error");
                Self::internal()
            }
            _ => Self::new(status, error_codes::INVALID_PARAMETER, e.to_string()),
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (4xxx)
    pub const WALLET_NOT_FOUND: i32 = 4001;
    pub const RECIPIENT_NOT_FOUND: i32 = 4002;
    pub const IDEMPOTENCY_CONFLICT: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionId;

    #[test]
    fn test_transfer_error_mapping() {
        let e = ApiError::from(TransferError::InsufficientBalance);
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, error_codes::INSUFFICIENT_BALANCE);

        let e = ApiError::from(TransferError::RecipientWalletNotFound);
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.code, error_codes::RECIPIENT_NOT_FOUND);

        let e = ApiError::from(TransferError::WalletNotFound);
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.code, error_codes::WALLET_NOT_FOUND);

        let e = ApiError::from(TransferError::IdempotencyKeyConflict(TransactionId::generate()));
        assert_eq!(e.status, StatusCode::CONFLICT);

        let e = ApiError::from(TransferError::SelfTransfer);
        assert_eq!(e.code, error_codes::INVALID_PARAMETER);
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let e = ApiError::from(TransferError::Internal("relation \"wallets\" missing".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.msg, "Internal server error");

        let e = ApiError::from(TransferError::StoreUnavailable("pool timed out".into()));
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!e.msg.contains("pool"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiResponse::<()>::error(1001, "bad")).unwrap();
        assert_eq!(body, serde_json::json!({"code": 1001, "msg": "bad"}));
    }
}
