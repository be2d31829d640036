use chrono::{DateTime, Utc};
use std::{fs, fs::File, time::Duration};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::{Config, Error, cache, gtfs::GtfsReader, state::StateStore};

/// Bound on the archive fetch.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Timestamps written to the state store use this layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Guarantees the four GTFS tables exist on disk and are no older than the
/// dataset TTL, downloading and extracting the archive when they are not.
pub struct DatasetManager<'a> {
    config: &'a Config,
    store: &'a dyn StateStore,
}

impl<'a> DatasetManager<'a> {
    pub fn new(config: &'a Config, store: &'a dyn StateStore) -> Self {
        Self { config, store }
    }

    /// Returns without touching the network when all table files exist and
    /// the recorded refresh timestamp is within the TTL. A download or
    /// extraction failure is fatal; there is no stale fallback.
    pub fn ensure_fresh(&self) -> Result<(), Error> {
        if self.tables_present() && self.is_recent() {
            debug!("GTFS dataset is fresh, skipping download");
            return Ok(());
        }

        info!("Downloading GTFS data from ATM Milano...");
        fs::create_dir_all(&self.config.gtfs_dir)?;
        if !self.config.gtfs_zip.exists() {
            self.download()?;
        }

        info!("Extracting GTFS data...");
        self.extract()?;

        let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        self.store
            .set(&cache::dataset_key(&self.config.state_namespace), &stamp);
        Ok(())
    }

    fn tables_present(&self) -> bool {
        GtfsReader::new(&self.config.gtfs_dir)
            .table_paths()
            .iter()
            .all(|path| path.exists())
    }

    /// A timestamp that is missing or does not parse counts as stale.
    fn is_recent(&self) -> bool {
        let key = cache::dataset_key(&self.config.state_namespace);
        let Some(raw) = self.store.get(&key) else {
            return false;
        };
        let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) else {
            return false;
        };
        let age = Utc::now().signed_duration_since(stamp.with_timezone(&Utc));
        age < self.config.dataset_ttl
    }

    fn download(&self) -> Result<(), Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        let bytes = client
            .get(&self.config.gtfs_url)
            .send()?
            .error_for_status()?
            .bytes()?;
        fs::write(&self.config.gtfs_zip, &bytes)?;
        Ok(())
    }

    /// Extracts over any existing table files. The table contents are not
    /// validated here; a corrupt table surfaces later as a parse error.
    fn extract(&self) -> Result<(), Error> {
        let file = File::open(&self.config.gtfs_zip)?;
        let mut archive = ZipArchive::new(file)?;
        archive.extract(&self.config.gtfs_dir)?;
        Ok(())
    }
}
