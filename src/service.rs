//! Price service orchestrator.
//!
//! Pure composition of [`BatchRegistry`] and [`LatestValueStore`]; holds no
//! state of its own. This is the contract surface the gateway calls into.

use std::collections::HashMap;

use crate::error::PriceError;
use crate::record::PriceRecord;
use crate::registry::BatchRegistry;
use crate::store::LatestValueStore;

pub struct PriceService {
    registry: BatchRegistry,
    store: LatestValueStore,
}

impl PriceService {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            registry: BatchRegistry::new(max_chunk_size),
            store: LatestValueStore::new(),
        }
    }

    /// Open a new batch and return its id.
    pub fn start_batch(&self) -> String {
        let batch_id = self.registry.create();
        tracing::info!(batch_id = %batch_id, "batch started");
        batch_id
    }

    /// Stage one chunk of records into an open batch.
    ///
    /// Nothing uploaded here is visible to readers until the batch
    /// completes.
    pub fn upload_chunk(
        &self,
        batch_id: &str,
        records: Vec<PriceRecord>,
    ) -> Result<(), PriceError> {
        let count = records.len();
        self.registry.stage_into(batch_id, records).inspect_err(|err| {
            tracing::warn!(batch_id = %batch_id, records = count, error = %err, "chunk rejected");
        })?;
        tracing::debug!(batch_id = %batch_id, records = count, "chunk staged");
        Ok(())
    }

    /// Publish a batch's staged records into the latest-value store.
    ///
    /// Returns `false` if the batch is unknown or already terminal; retried
    /// completions are expected call patterns, not errors.
    pub fn complete_batch(&self, batch_id: &str) -> bool {
        match self.registry.complete(batch_id) {
            Some(staged) => {
                let records = staged.len();
                self.store.merge(staged.into_values());
                tracing::info!(batch_id = %batch_id, records, "batch completed");
                true
            }
            None => {
                tracing::debug!(batch_id = %batch_id, "complete ignored: unknown or terminal batch");
                false
            }
        }
    }

    /// Discard a batch and everything it staged.
    pub fn cancel_batch(&self, batch_id: &str) -> bool {
        let cancelled = self.registry.cancel(batch_id);
        if cancelled {
            tracing::info!(batch_id = %batch_id, "batch cancelled");
        } else {
            tracing::debug!(batch_id = %batch_id, "cancel ignored: unknown or terminal batch");
        }
        cancelled
    }

    /// Latest records for the requested ids; absent ids are omitted.
    pub fn latest_prices(&self, ids: &[String]) -> HashMap<String, PriceRecord> {
        self.store.get_many(ids)
    }

    /// Latest record for one id, if any.
    pub fn latest_price(&self, id: &str) -> Option<PriceRecord> {
        self.store.get(id)
    }

    /// Number of batches currently open.
    pub fn open_batches(&self) -> usize {
        self.registry.len()
    }

    /// Number of ids with a published latest value.
    pub fn known_ids(&self) -> usize {
        self.store.len()
    }
}
