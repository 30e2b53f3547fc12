//! Coop Reports Server - cross-collection reconciliation for the egg
//! distribution dashboard
//!
//! Read-only aggregation over four loosely-coupled source collections
//! (daily sales, digital payments, cash payments, NECC rates), exposed as
//! a small HTTP API.
//!
//! # Module structure
//!
//! ```text
//! coop-server/src/
//! ├── core/     # config, state, server, errors
//! ├── db/       # embedded SurrealDB + repositories
//! ├── reports/  # the engine: sources, discovery, date keys, builder
//! ├── api/      # HTTP routes and handlers
//! └── utils/    # error, result, logger, time
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod reports;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use core::server::build_app;
pub use reports::{OutletDirectory, Source, SourceFetcher};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env (if any) and initialize logging.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());
}
