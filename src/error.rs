use thiserror::Error;

/// Failure taxonomy for batch ingestion.
///
/// `InvalidState` is internal: the registry removes terminal batches
/// atomically, so callers racing a terminal transition see `BatchNotFound`
/// at the service boundary.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("batch not found: {0}")]
    BatchNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("batch {batch_id} is no longer accepting records")]
    InvalidState { batch_id: String },
}
