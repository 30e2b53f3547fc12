//! Outlet discovery
//!
//! Outlets are not a declared entity anywhere upstream - they are the
//! free-text keys appearing inside the `outlets` maps of source documents.
//! Discovery scans a bounded recent sample of all four collections, unions
//! the keys, and memoizes the result for a short TTL.
//!
//! Lifecycle: COLD (no payload, or payload aged past the TTL) -> WARM
//! (payload served directly). COLD -> WARM only on a successful scan;
//! WARM -> COLD purely by elapsed wall-clock time. There is no explicit
//! invalidation trigger - an outlet added upstream is invisible until the
//! TTL runs out.

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use shared::{OutletRef, SourceCounts};

use super::clock::Clock;
use super::source::{Source, SourceFetcher};
use crate::utils::{AppError, AppResult};

/// Discovery scan result.
#[derive(Debug, Clone)]
pub struct OutletsInfo {
    pub outlets: Vec<OutletRef>,
    pub total_records: SourceCounts,
}

struct CacheEntry {
    info: OutletsInfo,
    stored_at: i64,
}

/// Memoized outlet discovery.
///
/// The cache entry is replaced wholesale on refresh, never merged. The
/// async mutex is held across the refresh so the check-then-scan-then-store
/// sequence is atomic; concurrent callers wait for one scan instead of
/// issuing duplicates.
pub struct OutletDirectory {
    cache: Mutex<Option<CacheEntry>>,
    ttl_millis: i64,
    sample_limit: usize,
    clock: Arc<dyn Clock>,
}

impl OutletDirectory {
    pub fn new(ttl_millis: i64, sample_limit: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: Mutex::new(None),
            ttl_millis,
            sample_limit,
            clock,
        }
    }

    /// Return the discovered outlets, scanning the sources only when the
    /// cached payload is missing or aged out.
    ///
    /// The boolean is true when the payload came from the cache.
    pub async fn discover(&self, fetcher: &dyn SourceFetcher) -> AppResult<(OutletsInfo, bool)> {
        let mut cache = self.cache.lock().await;

        let now = self.clock.now_millis();
        if let Some(entry) = cache.as_ref()
            && now - entry.stored_at < self.ttl_millis
        {
            tracing::debug!(age_ms = now - entry.stored_at, "Outlet discovery cache hit");
            return Ok((entry.info.clone(), true));
        }

        let info = self.scan(fetcher).await?;
        *cache = Some(CacheEntry {
            info: info.clone(),
            stored_at: self.clock.now_millis(),
        });

        Ok((info, false))
    }

    async fn scan(&self, fetcher: &dyn SourceFetcher) -> AppResult<OutletsInfo> {
        let limit = self.sample_limit;
        let (sales, digital, cash, rates) = tokio::try_join!(
            fetcher.fetch_recent(Source::DailySales, limit),
            fetcher.fetch_recent(Source::DigitalPayments, limit),
            fetcher.fetch_recent(Source::CashPayments, limit),
            fetcher.fetch_recent(Source::NeccRate, limit),
        )
        .map_err(|e| AppError::source_fetch(e.to_string()))?;

        // Union outlet names across every document of every source.
        // BTreeSet gives a stable, deterministic listing order.
        let mut names = BTreeSet::new();
        for doc in sales.iter().chain(&digital).chain(&cash).chain(&rates) {
            if let Some(outlets) = &doc.outlets {
                names.extend(outlets.keys().cloned());
            }
        }

        let info = OutletsInfo {
            outlets: names.into_iter().map(OutletRef::new).collect(),
            total_records: SourceCounts {
                sales: sales.len(),
                digital_payments: digital.len(),
                cash_payments: cash.len(),
                necc_rate: rates.len(),
            },
        };

        tracing::info!(
            outlets = info.outlets.len(),
            sales = info.total_records.sales,
            digital = info.total_records.digital_payments,
            cash = info.total_records.cash_payments,
            rates = info.total_records.necc_rate,
            "Outlet discovery scan complete"
        );

        Ok(info)
    }
}
