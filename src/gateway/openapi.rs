//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CancelBatchData, CompleteBatchData, StartBatchData, UploadChunkData,
};
use crate::record::PriceRecord;

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Latest-Value Price Cache API",
        version = "1.0.0",
        description = "Transactional batch ingestion for a latest-value price cache: \
            records are staged per batch and published atomically on completion.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::start_batch,
        crate::gateway::handlers::upload_chunk,
        crate::gateway::handlers::complete_batch,
        crate::gateway::handlers::cancel_batch,
        crate::gateway::handlers::get_latest_prices,
        crate::gateway::handlers::get_latest_price,
    ),
    components(
        schemas(
            PriceRecord,
            StartBatchData,
            UploadChunkData,
            CompleteBatchData,
            CancelBatchData,
            HealthResponse,
        )
    ),
    tags(
        (name = "Batch", description = "Batch lifecycle: start, upload, complete, cancel"),
        (name = "Prices", description = "Latest-value reads"),
        (name = "System", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;
