//! Data models
//!
//! - [`SourceDoc`] - the raw document shape shared by all four source
//!   collections (daily sales, digital payments, cash payments, NECC rates)
//! - report structures derived from those documents

mod report;
mod source_doc;

pub use report::{OutletRef, ReconciledDay, ReportResponse, SourceCounts};
pub use source_doc::SourceDoc;
