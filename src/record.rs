//! Price record value object.
//!
//! `asOf` is the authoritative recency marker: recency is decided by this
//! logical timestamp, never by arrival order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single keyed, timestamped price observation.
///
/// Immutable once constructed. Two records are equal iff `id`, `as_of`,
/// and `payload` are all equal; `payload` is opaque application data and
/// is never compared for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    /// Stable instrument identity (must not be empty)
    #[schema(example = "AAPL")]
    pub id: String,
    /// Logical timestamp of the observation (RFC 3339 on the wire)
    pub as_of: DateTime<Utc>,
    /// Opaque application payload
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

impl PriceRecord {
    pub fn new(id: impl Into<String>, as_of: DateTime<Utc>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            as_of,
            payload,
        }
    }
}
