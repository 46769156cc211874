//! Registry of live batches.
//!
//! Owns every [`BatchContext`] from `create` until the batch reaches a
//! terminal state. Removal from the registry and the terminal transition
//! form one atomic step: `DashMap::remove` hands the context to exactly one
//! caller, so no second complete/cancel can act twice and no later upload
//! can resolve the batch. Terminal batches are indistinguishable from
//! batches that never existed, by design.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::batch::BatchContext;
use crate::error::PriceError;
use crate::record::PriceRecord;

/// Default upper bound on records per uploaded chunk.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1000;

/// Thread-safe registry of in-flight batches.
pub struct BatchRegistry {
    batches: DashMap<String, Arc<BatchContext>>,
    max_chunk_size: usize,
}

impl BatchRegistry {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            batches: DashMap::new(),
            max_chunk_size,
        }
    }

    /// Open a new batch and return its id.
    ///
    /// Ids are UUID v4, unique for the life of the process and never
    /// reused.
    pub fn create(&self) -> String {
        let batch_id = Uuid::new_v4().to_string();
        self.batches
            .insert(batch_id.clone(), Arc::new(BatchContext::new(batch_id.clone())));
        batch_id
    }

    /// Stage one chunk of records into an open batch.
    ///
    /// The batch is resolved first: an upload targeting an unknown or
    /// terminal batch reports `NotFound` regardless of chunk content.
    /// Chunk validation is then all-or-nothing: an oversized chunk or a
    /// record with an empty id rejects the whole call with
    /// `InvalidArgument` and stages nothing. An empty chunk is a no-op.
    pub fn stage_into(&self, batch_id: &str, records: Vec<PriceRecord>) -> Result<(), PriceError> {
        let ctx = self
            .batches
            .get(batch_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| PriceError::BatchNotFound(batch_id.to_string()))?;

        if records.len() > self.max_chunk_size {
            return Err(PriceError::InvalidArgument(format!(
                "chunk of {} records exceeds limit of {}",
                records.len(),
                self.max_chunk_size
            )));
        }
        if records.iter().any(|r| r.id.is_empty()) {
            return Err(PriceError::InvalidArgument(
                "record id must not be empty".to_string(),
            ));
        }

        for record in records {
            // A terminal transition observed mid-chunk surfaces as
            // NotFound: externally the batch no longer exists.
            ctx.stage(record).map_err(|err| match err {
                PriceError::InvalidState { .. } => PriceError::BatchNotFound(batch_id.to_string()),
                other => other,
            })?;
        }
        Ok(())
    }

    /// Complete a batch, returning its staged snapshot on success.
    ///
    /// `None` means the batch was unknown or a racing cancel won.
    pub fn complete(&self, batch_id: &str) -> Option<HashMap<String, PriceRecord>> {
        let (_, ctx) = self.batches.remove(batch_id)?;
        if !ctx.try_complete() {
            return None;
        }
        // Cannot fail: this caller holds the only terminal transition.
        ctx.snapshot_staged().ok()
    }

    /// Cancel a batch, discarding everything it staged.
    pub fn cancel(&self, batch_id: &str) -> bool {
        match self.batches.remove(batch_id) {
            Some((_, ctx)) => ctx.try_cancel(),
            None => false,
        }
    }

    /// Number of batches currently open.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl Default for BatchRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}
