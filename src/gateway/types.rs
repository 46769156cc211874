//! API response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError` / `ApiResult`: handler-level error plumbing
//! - `error_codes`: Standard error code constants
//! - Various response DTOs

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::PriceError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
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
// Handler error plumbing
// ============================================================================

/// Handler-level error carrying HTTP status and API error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: error_codes::NOT_FOUND,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error_codes::INVALID_PARAMETER,
            msg: msg.into(),
        }
    }

    /// Convenience for `return ApiError::...(msg).into_err();`
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code, self.msg);
        (self.status, Json(body)).into_response()
    }
}

impl From<PriceError> for ApiError {
    fn from(err: PriceError) -> Self {
        match err {
            PriceError::BatchNotFound(_) => ApiError::not_found(err.to_string()),
            PriceError::InvalidArgument(_) => ApiError::bad_request(err.to_string()),
            // The registry surfaces terminal batches as NotFound.
            PriceError::InvalidState { batch_id } => {
                ApiError::not_found(format!("batch not found: {}", batch_id))
            }
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Create a 200 success result
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Batch creation response data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartBatchData {
    /// Id to use for subsequent uploads on this batch
    pub batch_id: String,
}

/// Chunk upload response data
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadChunkData {
    /// Number of records received in this chunk; stale records may still
    /// be dropped by the in-batch merge
    pub received: usize,
}

/// Batch completion response data
#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteBatchData {
    /// False when the batch is unknown or already terminal
    pub completed: bool,
}

/// Batch cancellation response data
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelBatchData {
    /// False when the batch is unknown or already completed
    pub cancelled: bool,
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

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
}
