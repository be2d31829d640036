use chrono::Duration;
use std::path::PathBuf;

/// Trip scanning stops once this many matching trips have been collected.
/// Keeps query latency bounded on a large trips table, at the cost of
/// under-reporting trips (and possibly directions) for busy lines.
pub const TRIP_SCAN_LIMIT: usize = 50;

/// Rows of departure times in the report are this wide.
pub const TIMES_PER_ROW: usize = 6;

/// Runtime configuration, built once at startup and passed by reference
/// into every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the GTFS archive is fetched from.
    pub gtfs_url: String,
    /// Root for generated report files.
    pub data_dir: PathBuf,
    /// Where the extracted GTFS tables live.
    pub gtfs_dir: PathBuf,
    /// Where the downloaded archive is kept.
    pub gtfs_zip: PathBuf,
    /// Maximum age of the extracted dataset before it is refreshed.
    pub dataset_ttl: Duration,
    /// Maximum age of a cached query result.
    pub query_ttl: Duration,
    pub trip_scan_limit: usize,
    /// Prefix for every key written to the state store.
    pub state_namespace: String,
    /// Program spawned to reach the external state store.
    pub state_program: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from("/data/generated/tramvia");
        let gtfs_dir = data_dir.join("gtfs");
        let gtfs_zip = gtfs_dir.join("gtfs.zip");
        Self {
            gtfs_url: "https://dati.comune.milano.it/gtfs.zip".into(),
            data_dir,
            gtfs_dir,
            gtfs_zip,
            dataset_ttl: Duration::hours(24),
            query_ttl: Duration::hours(1),
            trip_scan_limit: TRIP_SCAN_LIMIT,
            state_namespace: "tramvia".into(),
            state_program: "statectl".into(),
        }
    }
}

impl Config {
    /// A config with all paths rebased under `root`. Used by tests to keep
    /// every side effect inside a temporary directory.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let data_dir = root.into();
        let gtfs_dir = data_dir.join("gtfs");
        let gtfs_zip = gtfs_dir.join("gtfs.zip");
        Self {
            data_dir,
            gtfs_dir,
            gtfs_zip,
            ..Default::default()
        }
    }
}
