//! API response envelope
//!
//! Every endpoint answers with this structure: a `success` flag, the
//! payload flattened alongside it on success, or a human-readable `error`
//! string on failure. Internal details (queries, paths, stack traces) are
//! never put into `error`.

use serde::{Deserialize, Serialize};

/// Unified API response structure.
///
/// ```json
/// { "success": true, "outletId": "A", ... }
/// { "success": false, "error": "Outlet ID is required" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> AppResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
