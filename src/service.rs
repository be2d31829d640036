use chrono::{Local, Utc};
use std::{fs, path::PathBuf};
use tracing::{error, info};

use crate::{
    Config, Error, cache,
    dataset::DatasetManager,
    engine::{ScheduleEngine, ScheduleQuery},
    gtfs::GtfsReader,
    report,
    repository::{Repository, TRAM_ROUTE_TYPE},
    state::StateStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Report file for this query, freshly written or recovered from cache.
    pub text_path: PathBuf,
    pub cache: CacheStatus,
}

/// Ties the pipeline together behind the query cache: a hit short-circuits
/// everything, a miss runs dataset refresh, indexing, the engine and the
/// formatter, persists the report and records a cache entry.
pub struct ScheduleService<'a> {
    config: &'a Config,
    store: &'a dyn StateStore,
}

impl<'a> ScheduleService<'a> {
    pub fn new(config: &'a Config, store: &'a dyn StateStore) -> Self {
        Self { config, store }
    }

    pub fn query(&self, query: &ScheduleQuery) -> Result<QueryOutcome, Error> {
        let key = cache::query_key(&self.config.state_namespace, query);
        if let Some(entry) = cache::lookup(self.store, &key, self.config.query_ttl) {
            info!("Query cache hit, reusing {}", entry.text_path);
            return Ok(QueryOutcome {
                text_path: entry.text_path.into(),
                cache: CacheStatus::Hit,
            });
        }

        DatasetManager::new(self.config, self.store).ensure_fresh()?;

        info!("Querying GTFS data for line {}...", query.line);
        let gtfs = GtfsReader::new(&self.config.gtfs_dir);
        let repository = Repository::new().load_gtfs(&gtfs)?;
        let engine = ScheduleEngine::new(&repository, &gtfs, self.config.trip_scan_limit);

        let result = match engine.query(query) {
            Err(Error::RouteNotFound { line }) => {
                self.list_tram_routes(&repository);
                return Err(Error::RouteNotFound { line });
            }
            other => other?,
        };

        let output = report::format(query, &result, &repository, Utc::now());
        let text_path = cache::report_path(
            &self.config.data_dir,
            &query.line,
            query.stop_name.as_deref(),
            Local::now(),
        );
        if let Some(parent) = text_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&text_path, &output)?;

        cache::record(self.store, &key, query, &text_path);

        Ok(QueryOutcome {
            text_path,
            cache: CacheStatus::Miss,
        })
    }

    /// Remediation aid for an unknown line: list every tram route we do
    /// know about on the error stream.
    fn list_tram_routes(&self, repository: &Repository) {
        error!("Available tram lines (route_type={TRAM_ROUTE_TYPE}):");
        for route in repository.tram_routes() {
            error!("  {}: {}", route.short_name, route.long_name);
        }
    }
}
