//! Reports API module
//!
//! | Path | Method | Notes |
//! |------|--------|-------|
//! | /api/reports | GET | reconciled per-day report for one outlet |
//! | /api/reports/outlets | GET | discovered outlet list (TTL cached) |
//! | /api/reports/export | GET | same report as CSV attachment |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::report))
        .route("/outlets", get(handler::outlets))
        .route("/export", get(handler::export))
}
