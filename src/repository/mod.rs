use std::{collections::HashMap, sync::Arc, time::Instant};

mod models;
pub use models::*;
use tracing::debug;

use crate::gtfs::{self, GtfsReader};

type IdToIndex = HashMap<Arc<str>, usize>;

/// In-memory index over the small GTFS tables (routes and stops).
///
/// Trips and stop_times are deliberately not materialized here; the query
/// engine scans them through the reader instead.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    routes: Box<[Route]>,
    stops: Box<[Stop]>,
    route_lookup: IdToIndex,
    stop_lookup: IdToIndex,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn load_gtfs(mut self, gtfs: &GtfsReader) -> Result<Self, gtfs::Error> {
        debug!("Loading routes...");
        let now = Instant::now();
        let mut route_lookup: IdToIndex = HashMap::new();
        let mut routes: Vec<Route> = Vec::new();
        gtfs.stream_routes(|(i, route)| {
            let mut value: Route = route.into();
            value.index = i as u32;
            route_lookup.insert(value.id.clone(), i);
            routes.push(value);
        })?;
        self.routes = routes.into();
        self.route_lookup = route_lookup;
        debug!("Loading routes took {:?}", now.elapsed());

        debug!("Loading stops...");
        let now = Instant::now();
        let mut stop_lookup: IdToIndex = HashMap::new();
        let mut stops: Vec<Stop> = Vec::new();
        gtfs.stream_stops(|(i, stop)| {
            let mut value: Stop = stop.into();
            value.index = i as u32;
            stop_lookup.insert(value.id.clone(), i);
            stops.push(value);
        })?;
        self.stops = stops.into();
        self.stop_lookup = stop_lookup;
        debug!("Loading stops took {:?}", now.elapsed());

        Ok(self)
    }

    /// Routes in table insertion order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        Some(&self.routes[*index])
    }

    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(id)?;
        Some(&self.stops[*index])
    }

    /// All routes flagged as trams, sorted by route id.
    pub fn tram_routes(&self) -> Vec<&Route> {
        let mut routes: Vec<_> = self.routes.iter().filter(|route| route.is_tram()).collect();
        routes.sort_by(|a, b| a.id.cmp(&b.id));
        routes
    }

    /// Case-insensitive substring search over stop names, in table order.
    pub fn search_stops_by_name(&self, needle: &str) -> Vec<&Stop> {
        let needle = needle.to_lowercase();
        self.stops
            .iter()
            .filter(|stop| stop.name.to_lowercase().contains(&needle))
            .collect()
    }
}
