use thiserror::Error;

use crate::{engine::ScheduleType, gtfs};

#[derive(Error, Debug)]
pub enum Error {
    #[error("schedule-type must be one of: weekday, saturday, sunday (got '{0}')")]
    InvalidScheduleType(String),
    #[error("failed to download GTFS data: {0}")]
    Download(#[from] reqwest::Error),
    #[error("failed to extract GTFS archive: {0}")]
    Extraction(#[from] zip::result::ZipError),
    #[error("line {line} not found in GTFS data")]
    RouteNotFound { line: String },
    #[error("no trips found for line {line} on {schedule_type}")]
    NoTripsFound {
        line: String,
        schedule_type: ScheduleType,
    },
    #[error("GTFS data error: {0}")]
    Gtfs(#[from] gtfs::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
