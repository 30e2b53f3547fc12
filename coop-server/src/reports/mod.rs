//! Cross-collection reports engine
//!
//! Two read-only operations over the four source collections:
//! outlet discovery (TTL-cached union of outlet names) and the
//! per-outlet reconciliation report.

pub mod builder;
pub mod clock;
pub mod date_key;
pub mod discovery;
pub mod source;

pub use builder::build_report;
pub use clock::{Clock, SystemClock};
pub use discovery::{OutletDirectory, OutletsInfo};
pub use source::{FetchError, Source, SourceFetcher};
