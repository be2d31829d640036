use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self},
    ops::ControlFlow,
    path::{Path, PathBuf},
};
use thiserror::Error;

mod config;
pub mod models;
pub use config::*;
use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find table file: {0}")]
    FileNotFound(String),
}

/// Streaming reader over an extracted GTFS dataset directory.
///
/// Rows are handed to callbacks one at a time so the large tables (trips,
/// stop_times) never have to be materialized in memory. A missing table file
/// or a malformed row is fatal; there is no partial-recovery mode.
pub struct GtfsReader {
    dir: PathBuf,
    config: Config,
}

impl GtfsReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config: Default::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Paths of the four required table files.
    pub fn table_paths(&self) -> [PathBuf; 4] {
        self.config
            .table_names()
            .map(|name| self.dir.join(name))
    }

    pub fn stream_routes<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsRoute)),
    {
        stream_from_dir(&self.dir, &self.config.routes_path, f)
    }

    pub fn stream_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsStop)),
    {
        stream_from_dir(&self.dir, &self.config.stops_path, f)
    }

    /// Scans trips in row order until the callback breaks. Used to bound the
    /// trip selection to a fixed number of matches.
    pub fn scan_trips<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsTrip)) -> ControlFlow<()>,
    {
        scan_from_dir(&self.dir, &self.config.trips_path, f)
    }

    /// Single linear pass over the stop_times table. The table is not
    /// ordered by trip or stop, so every row has to be visited.
    pub fn stream_stop_times<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsStopTime)),
    {
        stream_from_dir(&self.dir, &self.config.stop_times_path, f)
    }
}

fn stream_from_dir<T, F>(dir: &Path, file_name: &str, mut f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    scan_from_dir(dir, file_name, |row| {
        f(row);
        ControlFlow::Continue(())
    })
}

fn scan_from_dir<T, F>(dir: &Path, file_name: &str, mut f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)) -> ControlFlow<()>,
{
    let path = dir.join(file_name);
    if !path.exists() {
        return Err(self::Error::FileNotFound(path.display().to_string()));
    }
    let file = File::open(&path)?;
    let mut reader = csv::Reader::from_reader(file);
    for (i, row) in reader.deserialize().enumerate() {
        if f((i, row?)).is_break() {
            break;
        }
    }
    Ok(())
}
