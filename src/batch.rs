//! Per-batch staging area and lifecycle state machine.
//!
//! A batch stages records privately until it is completed; nothing in the
//! staging map is visible to readers before then. The lifecycle is a single
//! atomic state word driven by compare-and-swap, so `try_complete` and
//! `try_cancel` are mutually exclusive: whichever transition wins first
//! decides the terminal state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::PriceError;
use crate::record::PriceRecord;

/// Batch lifecycle states.
///
/// `Started` is initial; `Completed` and `Cancelled` are terminal and
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BatchState {
    Started = 0,
    Completed = 1,
    Cancelled = 2,
}

impl BatchState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => BatchState::Started,
            1 => BatchState::Completed,
            _ => BatchState::Cancelled,
        }
    }
}

/// A single batch's private staging area.
///
/// Thread-safe for parallel chunk uploads: per-id merges run under the
/// staging map's entry lock, and the terminal transition is a single CAS
/// on the state word.
pub struct BatchContext {
    batch_id: String,
    state: AtomicU8,
    staged: DashMap<String, PriceRecord>,
}

impl BatchContext {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            state: AtomicU8::new(BatchState::Started as u8),
            staged: DashMap::new(),
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn state(&self) -> BatchState {
        BatchState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Merge one record into the staging map.
    ///
    /// Last-write-wins by `as_of` per id: the record replaces the staged
    /// entry only if its `as_of` is strictly later. An equal or older
    /// `as_of` is silently dropped (business rule, not an error).
    ///
    /// Fails with `InvalidState` once the batch is terminal, including when
    /// a terminal transition lands while this call is in flight.
    pub fn stage(&self, record: PriceRecord) -> Result<(), PriceError> {
        if self.state() != BatchState::Started {
            return Err(PriceError::InvalidState {
                batch_id: self.batch_id.clone(),
            });
        }

        match self.staged.entry(record.id.clone()) {
            Entry::Occupied(mut slot) => {
                if record.as_of > slot.get().as_of {
                    slot.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }

        // A complete/cancel may have raced past the check above. Report
        // failure so the caller never believes a record landed in a batch
        // it observed as terminal. A record that slipped into a cancelled
        // context is dropped with it, unread.
        if self.state() != BatchState::Started {
            return Err(PriceError::InvalidState {
                batch_id: self.batch_id.clone(),
            });
        }
        Ok(())
    }

    /// Transition `Started -> Completed`.
    ///
    /// Returns `true` for exactly one caller; `false` if the batch is
    /// already terminal.
    pub fn try_complete(&self) -> bool {
        self.state
            .compare_exchange(
                BatchState::Started as u8,
                BatchState::Completed as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Transition `Started -> Cancelled` and discard all staged records.
    ///
    /// Returns `false` if the batch is already terminal.
    pub fn try_cancel(&self) -> bool {
        let won = self
            .state
            .compare_exchange(
                BatchState::Started as u8,
                BatchState::Cancelled as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if won {
            self.staged.clear();
        }
        won
    }

    /// Owned copy of the staged records, callable only after completion.
    pub fn snapshot_staged(&self) -> Result<HashMap<String, PriceRecord>, PriceError> {
        if self.state() != BatchState::Completed {
            return Err(PriceError::InvalidState {
                batch_id: self.batch_id.clone(),
            });
        }
        Ok(self
            .staged
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect())
    }

    /// Number of distinct ids currently staged.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}
