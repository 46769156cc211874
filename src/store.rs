//! Globally-visible latest-value table.
//!
//! The only state readers ever observe. Updated exclusively by the
//! completion step of a batch; each key advances monotonically by `as_of`
//! under its shard's entry lock, so no reader ever sees a regression.
//! There is no global lock: independent batches merge concurrently and
//! only contend where they touch the same key.

use std::collections::HashMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::record::PriceRecord;

/// Thread-safe map from instrument id to its most recent record.
pub struct LatestValueStore {
    latest: DashMap<String, PriceRecord>,
}

impl LatestValueStore {
    pub fn new() -> Self {
        Self {
            latest: DashMap::new(),
        }
    }

    /// Merge a completed batch's records.
    ///
    /// Per key: replace the stored record only if the incoming `as_of` is
    /// strictly later (an absent key counts as infinitely old). The compare
    /// and the replace happen under the entry lock.
    pub fn merge<I>(&self, records: I)
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        for record in records {
            match self.latest.entry(record.id.clone()) {
                Entry::Occupied(mut slot) => {
                    if record.as_of > slot.get().as_of {
                        slot.insert(record);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
    }

    /// Current record for one id, if any.
    pub fn get(&self, id: &str) -> Option<PriceRecord> {
        self.latest.get(id).map(|entry| entry.value().clone())
    }

    /// Current records for the requested ids; absent ids are omitted.
    pub fn get_many(&self, ids: &[String]) -> HashMap<String, PriceRecord> {
        let mut result = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = self.latest.get(id) {
                result.insert(id.clone(), entry.value().clone());
            }
        }
        result
    }

    /// Number of ids with a known latest value.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl Default for LatestValueStore {
    fn default() -> Self {
        Self::new()
    }
}
