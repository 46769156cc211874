//! lastprice - Latest-Value Price Cache
//!
//! An in-memory last-value cache with transactional batch semantics:
//! records are staged privately per batch, merged last-write-wins by
//! logical timestamp, and published atomically when the batch completes.
//!
//! # Modules
//!
//! - [`record`] - `PriceRecord` value object
//! - [`batch`] - Per-batch staging area and lifecycle state machine
//! - [`registry`] - Registry of live batches (id issuance, routing)
//! - [`store`] - Globally-visible latest-value table
//! - [`service`] - `PriceService` orchestrator (the contract surface)
//! - [`error`] - Failure taxonomy
//! - [`gateway`] - HTTP API layer (axum)

pub mod batch;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod record;
pub mod registry;
pub mod service;
pub mod store;

// Convenient re-exports at crate root
pub use batch::{BatchContext, BatchState};
pub use config::AppConfig;
pub use error::PriceError;
pub use record::PriceRecord;
pub use registry::{BatchRegistry, DEFAULT_MAX_CHUNK_SIZE};
pub use service::PriceService;
pub use store::LatestValueStore;
