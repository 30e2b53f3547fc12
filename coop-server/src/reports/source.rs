//! Source fetch contract
//!
//! The reports engine reads four independently-written collections. It
//! consumes them through [`SourceFetcher`], a bounded "most recent N
//! documents" capability, so the engine stays testable against doubles
//! and never couples to the storage layer directly.

use async_trait::async_trait;
use thiserror::Error;

use shared::SourceDoc;

/// The four source collections a report is reconciled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    DailySales,
    DigitalPayments,
    CashPayments,
    NeccRate,
}

impl Source {
    /// Storage table name for this source.
    pub fn table(&self) -> &'static str {
        match self {
            Source::DailySales => "daily_sales",
            Source::DigitalPayments => "digital_payments",
            Source::CashPayments => "cash_payments",
            Source::NeccRate => "necc_rate",
        }
    }
}

/// A source fetch failed. Any single failure aborts the whole operation
/// (discovery or report build) - no partial results, no retry.
#[derive(Debug, Error)]
#[error("failed to fetch {source} documents: {message}")]
pub struct FetchError {
    pub source: &'static str,
    pub message: String,
}

impl FetchError {
    pub fn new(source: Source, message: impl Into<String>) -> Self {
        Self {
            source: source.table(),
            message: message.into(),
        }
    }
}

/// Bounded fetch of the most recent documents of one source, newest first
/// by `created_at`.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_recent(&self, source: Source, limit: usize)
    -> Result<Vec<SourceDoc>, FetchError>;
}
