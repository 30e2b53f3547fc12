//! Reconciled report structures
//!
//! These exist only inside a report response; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::util::round2;

/// A discovered outlet. Outlet names are free-text keys inside the
/// `outlets` maps of source documents, so id and name coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletRef {
    pub id: String,
    pub name: String,
}

impl OutletRef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }
}

/// Per-source document counts (scanned during discovery, or reconciled
/// into a report).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCounts {
    pub sales: usize,
    pub digital_payments: usize,
    pub cash_payments: usize,
    pub necc_rate: usize,
}

/// One outlet-day reconciled across the four sources.
///
/// Invariants, enforced by the builder and checked by tests:
/// - `total_amount == round2(sales_qty * necc_rate)`
/// - `total_recv == round2(digital_pay + cash_pay)`
/// - `difference == round2(total_recv - total_amount)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledDay {
    /// Display date key ("Mon DD, YYYY", or the "Unknown Date" /
    /// "Invalid Date" buckets).
    pub date: String,
    pub sales_qty: f64,
    pub necc_rate: f64,
    pub total_amount: f64,
    pub digital_pay: f64,
    pub cash_pay: f64,
    pub total_recv: f64,
    pub difference: f64,
}

impl ReconciledDay {
    /// Compute the derived fields from the accumulated base fields.
    pub fn finalize(&mut self) {
        self.total_amount = round2(self.sales_qty * self.necc_rate);
        self.total_recv = round2(self.digital_pay + self.cash_pay);
        self.difference = round2(self.total_recv - self.total_amount);
    }
}

/// Full report payload for one outlet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub outlet_id: String,
    pub total_sales_quantity: f64,
    pub average_necc_rate: f64,
    pub total_amount: f64,
    pub total_difference: f64,
    pub transactions: Vec<ReconciledDay>,
    /// Per-source counts of documents scanned for this report.
    pub records_scanned: SourceCounts,
    /// Wall-clock build time in milliseconds.
    pub elapsed_ms: u64,
}
