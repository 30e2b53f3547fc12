//! Source collection repository
//!
//! Bounded recency sampling over the four source collections. Plain
//! `ORDER BY ... LIMIT` only - combining WHERE with LIMIT misorders
//! results on the embedded engine, so date filtering happens in the
//! report engine instead.

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::SourceDoc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::reports::{FetchError, Source, SourceFetcher};

#[derive(Clone)]
pub struct SourceRepository {
    base: BaseRepository,
}

impl SourceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch the most recent `limit` documents of one source, newest
    /// first by `created_at`.
    pub async fn find_recent(&self, source: Source, limit: usize) -> RepoResult<Vec<SourceDoc>> {
        // The record id is deliberately not selected; documents travel as
        // plain field bags.
        let query = format!(
            "SELECT date, outlets, rate, created_at FROM type::table($table) \
             ORDER BY created_at DESC LIMIT {limit}"
        );
        let docs: Vec<SourceDoc> = self
            .base
            .db()
            .query(query)
            .bind(("table", source.table()))
            .await?
            .take(0)?;
        Ok(docs)
    }

    /// Insert one document into a source collection.
    ///
    /// The dashboard features that own these collections write through
    /// their own stacks; this exists for seeding and tests.
    pub async fn insert(&self, source: Source, doc: SourceDoc) -> RepoResult<()> {
        self.base
            .db()
            .query("CREATE type::table($table) CONTENT $doc")
            .bind(("table", source.table()))
            .bind(("doc", doc))
            .await?;
        Ok(())
    }

    /// Total document count for one source.
    pub async fn count(&self, source: Source) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM type::table($table) GROUP ALL")
            .bind(("table", source.table()))
            .await?;
        let counts: Vec<CountRow> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: usize,
}

#[async_trait]
impl SourceFetcher for SourceRepository {
    async fn fetch_recent(
        &self,
        source: Source,
        limit: usize,
    ) -> Result<Vec<SourceDoc>, FetchError> {
        self.find_recent(source, limit)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(msg) | RepoError::Database(msg) => {
                    FetchError::new(source, msg)
                }
            })
    }
}
