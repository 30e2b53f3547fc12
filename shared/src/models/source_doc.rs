//! Raw source document model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One document from any of the four source collections.
///
/// The collections are written by independent dashboard features and the
/// shapes drift: `date` may be an ISO day, an RFC3339 timestamp, a millis
/// epoch rendered as a string, or missing entirely; `outlets` may be
/// absent; rate documents sometimes carry a flat `rate` instead of a
/// per-outlet map. Everything is optional here and normalization happens
/// in one place (the report engine), instead of each consumer poking at
/// loosely-typed values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDoc {
    /// Calendar date the document describes, as entered upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Per-outlet values: quantity for sales docs, monetary amount for
    /// payment docs, rate for per-outlet rate docs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlets: Option<HashMap<String, f64>>,

    /// Flat NECC rate, used by rate documents that are not split by outlet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,

    /// Insertion timestamp (Unix millis). Recency ordering key for the
    /// bounded "most recent N" fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl SourceDoc {
    /// Value recorded for `outlet` in this document, if present.
    ///
    /// Presence is the test, not truthiness: an explicit `0` is a value.
    pub fn outlet_value(&self, outlet: &str) -> Option<f64> {
        self.outlets.as_ref().and_then(|m| m.get(outlet)).copied()
    }
}
