//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type and alias
//! - logging setup, request-side date parsing

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::AppError;
pub use result::AppResult;
