//! Batch lifecycle and price query handlers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa::ToSchema;

use super::state::AppState;
use super::types::{
    ApiError, ApiResult, CancelBatchData, CompleteBatchData, StartBatchData, UploadChunkData, ok,
};
use crate::record::PriceRecord;

/// Open a new batch
///
/// POST /api/v1/prices/batch/start
#[utoipa::path(
    post,
    path = "/api/v1/prices/batch/start",
    responses(
        (status = 200, description = "Batch created", body = StartBatchData, content_type = "application/json")
    ),
    tag = "Batch"
)]
pub async fn start_batch(State(state): State<Arc<AppState>>) -> ApiResult<StartBatchData> {
    let batch_id = state.service.start_batch();
    ok(StartBatchData { batch_id })
}

/// Upload one chunk of records into an open batch
///
/// POST /api/v1/prices/batch/{batch_id}/upload
///
/// Records are staged privately; nothing becomes readable until the batch
/// is completed. Chunks may be uploaded concurrently into the same batch.
#[utoipa::path(
    post,
    path = "/api/v1/prices/batch/{batch_id}/upload",
    params(
        ("batch_id" = String, Path, description = "Batch ID from /batch/start")
    ),
    request_body = Vec<PriceRecord>,
    responses(
        (status = 200, description = "Chunk staged", body = UploadChunkData, content_type = "application/json"),
        (status = 400, description = "Chunk too large or malformed record"),
        (status = 404, description = "Batch unknown or already terminal")
    ),
    tag = "Batch"
)]
pub async fn upload_chunk(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
    Json(records): Json<Vec<PriceRecord>>,
) -> ApiResult<UploadChunkData> {
    let received = records.len();
    state.service.upload_chunk(&batch_id, records)?;
    ok(UploadChunkData { received })
}

/// Complete a batch, publishing its staged records atomically
///
/// POST /api/v1/prices/batch/{batch_id}/complete
///
/// Returns `completed: false` when the batch is unknown or already
/// terminal; retried completions are expected, not errors.
#[utoipa::path(
    post,
    path = "/api/v1/prices/batch/{batch_id}/complete",
    params(
        ("batch_id" = String, Path, description = "Batch ID from /batch/start")
    ),
    responses(
        (status = 200, description = "Completion outcome", body = CompleteBatchData, content_type = "application/json")
    ),
    tag = "Batch"
)]
pub async fn complete_batch(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
) -> ApiResult<CompleteBatchData> {
    let completed = state.service.complete_batch(&batch_id);
    ok(CompleteBatchData { completed })
}

/// Cancel a batch, discarding everything it staged
///
/// POST /api/v1/prices/batch/{batch_id}/cancel
#[utoipa::path(
    post,
    path = "/api/v1/prices/batch/{batch_id}/cancel",
    params(
        ("batch_id" = String, Path, description = "Batch ID from /batch/start")
    ),
    responses(
        (status = 200, description = "Cancellation outcome", body = CancelBatchData, content_type = "application/json")
    ),
    tag = "Batch"
)]
pub async fn cancel_batch(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
) -> ApiResult<CancelBatchData> {
    let cancelled = state.service.cancel_batch(&batch_id);
    ok(CancelBatchData { cancelled })
}

/// Get latest prices for a set of ids
///
/// GET /api/v1/prices?ids=AAPL,TSLA
///
/// Ids with no published record are omitted from the result.
#[utoipa::path(
    get,
    path = "/api/v1/prices",
    params(
        ("ids" = String, Query, description = "Comma-separated instrument ids")
    ),
    responses(
        (status = 200, description = "Map of id to latest record", content_type = "application/json"),
        (status = 400, description = "Missing ids parameter")
    ),
    tag = "Prices"
)]
pub async fn get_latest_prices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<HashMap<String, PriceRecord>> {
    let Some(raw) = params.get("ids") else {
        return ApiError::bad_request("missing required parameter: ids").into_err();
    };

    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    ok(state.service.latest_prices(&ids))
}

/// Get the latest price for a single id
///
/// GET /api/v1/prices/{id}
#[utoipa::path(
    get,
    path = "/api/v1/prices/{id}",
    params(
        ("id" = String, Path, description = "Instrument id")
    ),
    responses(
        (status = 200, description = "Latest record", body = PriceRecord, content_type = "application/json"),
        (status = 404, description = "No price published for this id")
    ),
    tag = "Prices"
)]
pub async fn get_latest_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<PriceRecord> {
    match state.service.latest_price(&id) {
        Some(record) => ok(record),
        None => ApiError::not_found(format!("no price for id: {}", id)).into_err(),
    }
}

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check(State(_state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    ok(HealthResponse {
        timestamp_ms: now_ms,
    })
}
