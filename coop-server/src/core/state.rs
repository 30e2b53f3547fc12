use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::SourceRepository;
use crate::reports::{OutletDirectory, SourceFetcher, SystemClock};

/// Shared server state - one instance cloned into every handler.
///
/// Handlers reach the source collections only through the
/// [`SourceFetcher`] trait object, so the whole HTTP surface can be
/// exercised against in-memory doubles.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// Source collection access used by the reports engine
    pub fetcher: Arc<dyn SourceFetcher>,
    /// Memoized outlet discovery
    pub outlets: Arc<OutletDirectory>,
}

impl ServerState {
    /// Assemble state from pre-built parts. Used by tests to swap the
    /// fetcher for a double; production goes through [`Self::initialize`].
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        fetcher: Arc<dyn SourceFetcher>,
        outlets: Arc<OutletDirectory>,
    ) -> Self {
        Self {
            config,
            db,
            fetcher,
            outlets,
        }
    }

    /// Initialize production state: work directory, embedded database,
    /// repository-backed fetcher, discovery cache.
    pub async fn initialize(config: &Config) -> Result<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| ServerError::Config(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("coop.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        let db = db_service.db;

        let fetcher: Arc<dyn SourceFetcher> = Arc::new(SourceRepository::new(db.clone()));
        let outlets = Arc::new(OutletDirectory::new(
            (config.discovery_cache_ttl_secs * 1000) as i64,
            config.discovery_sample_limit,
            Arc::new(SystemClock),
        ));

        Ok(Self::new(config.clone(), db, fetcher, outlets))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
