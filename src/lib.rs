pub mod cache;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod gtfs;
pub mod report;
pub mod repository;
pub mod service;
pub mod state;

pub use config::Config;
pub use error::Error;
