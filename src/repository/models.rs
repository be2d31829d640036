use std::sync::Arc;

use crate::gtfs::models::{GtfsRoute, GtfsStop};

/// GTFS route_type code for trams.
pub const TRAM_ROUTE_TYPE: i32 = 0;

#[derive(Debug, Clone)]
pub struct Route {
    pub index: u32,
    pub id: Arc<str>,
    pub short_name: Arc<str>,
    pub long_name: Arc<str>,
    pub route_type: i32,
}

impl Route {
    pub fn is_tram(&self) -> bool {
        self.route_type == TRAM_ROUTE_TYPE
    }
}

impl From<GtfsRoute> for Route {
    fn from(value: GtfsRoute) -> Self {
        Self {
            index: 0,
            id: value.route_id.into(),
            short_name: value.route_short_name.into(),
            long_name: value.route_long_name.into(),
            route_type: value.route_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stop {
    pub index: u32,
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl From<GtfsStop> for Stop {
    fn from(value: GtfsStop) -> Self {
        Self {
            index: 0,
            id: value.stop_id.into(),
            name: value.stop_name.into(),
            lat: value.stop_lat,
            lon: value.stop_lon,
        }
    }
}
