//! Gateway types module
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for API input
//! - [`TransferBody`]: Transfer request body
//!
//! ## Output Types
//! - [`DisplayAmount`]: Type-safe formatted amount for API responses
//! - [`ApiResponse<T>`]: Unified API response wrapper

pub mod money;
pub mod response;
pub mod wallet;

pub use money::{DisplayAmount, StrictDecimal};
pub use response::{ApiError, ApiResponse, ApiResult, error_codes, ok};
pub use wallet::{
    BalanceData, HistoryItem, HistoryParams, TransactionView, TransferBody, TransferData,
};
