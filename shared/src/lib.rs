//! Shared types for the Coop reports service
//!
//! Common types used by the server and by tests: source document shapes,
//! reconciled report structures, the API response envelope, and small
//! utility functions.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    OutletRef, ReconciledDay, ReportResponse, SourceCounts, SourceDoc,
};
pub use response::AppResponse;
