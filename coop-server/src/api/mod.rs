//! API route modules
//!
//! - [`health`] - health checks
//! - [`reports`] - cross-collection reports (discovery, report, export)

pub mod health;
pub mod reports;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
