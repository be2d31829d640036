use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt,
    ops::ControlFlow,
    str::FromStr,
    sync::Arc,
};

use tracing::{debug, warn};

use crate::{Error, gtfs::GtfsReader, repository::Repository};

/// Day-type classification used to pick which trips apply to a query.
///
/// Classification is a literal substring match against `service_id`, not a
/// calendar lookup. A service id that happens to embed more than one marker
/// will be picked up by more than one type; that trade-off is accepted for
/// compatibility with the feed's naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleType {
    Weekday,
    Saturday,
    Sunday,
}

impl ScheduleType {
    /// Marker substring looked up inside `service_id`.
    pub const fn pattern(&self) -> &'static str {
        match self {
            Self::Weekday => " LV ",
            Self::Saturday => " SAB ",
            Self::Sunday => " FEST ",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekday" => Ok(Self::Weekday),
            "saturday" => Ok(Self::Saturday),
            "sunday" => Ok(Self::Sunday),
            other => Err(Error::InvalidScheduleType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleQuery {
    pub line: String,
    /// `None` means all stops.
    pub stop_name: Option<String>,
    pub schedule_type: ScheduleType,
}

/// One departure at a stop: the scheduled time and the trip's headsign,
/// which doubles as the direction label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub time: String,
    pub headsign: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct ScheduleResult {
    pub route_id: Arc<str>,
    pub trip_count: usize,
    /// Stop ids matched by the stop-name filter, empty when no filter
    /// applied (or when it degraded to unfiltered).
    pub matching_stops: Vec<Arc<str>>,
    /// Per-stop departures, deduplicated and sorted by time then headsign.
    /// Keyed by stop id so iteration is already in report order.
    pub departures: BTreeMap<Arc<str>, Vec<Departure>>,
}

/// Runs the query pipeline: route resolution, capped trip selection,
/// optional stop filtering, then one pass over stop_times.
pub struct ScheduleEngine<'a> {
    repository: &'a Repository,
    gtfs: &'a GtfsReader,
    trip_limit: usize,
}

impl<'a> ScheduleEngine<'a> {
    pub fn new(repository: &'a Repository, gtfs: &'a GtfsReader, trip_limit: usize) -> Self {
        Self {
            repository,
            gtfs,
            trip_limit,
        }
    }

    pub fn query(&self, query: &ScheduleQuery) -> Result<ScheduleResult, Error> {
        let route_id = self.resolve_route(&query.line)?;
        debug!("Resolved line {} to route {}", query.line, route_id);

        let trips = self.select_trips(&route_id, query.schedule_type.pattern())?;
        if trips.is_empty() {
            return Err(Error::NoTripsFound {
                line: query.line.clone(),
                schedule_type: query.schedule_type,
            });
        }

        let mut matching_stops: Vec<Arc<str>> = Vec::new();
        if let Some(name) = query.stop_name.as_deref()
            && !name.is_empty()
        {
            let matches = self.repository.search_stops_by_name(name);
            if matches.is_empty() {
                warn!("No stops found matching '{name}'");
                warn!("Showing all stops for this line instead");
            } else {
                matching_stops = matches.iter().map(|stop| stop.id.clone()).collect();
            }
        }
        let stop_filter: Option<HashSet<&str>> = if matching_stops.is_empty() {
            None
        } else {
            Some(matching_stops.iter().map(|id| id.as_ref()).collect())
        };

        let departures = self.collect_departures(&trips, stop_filter.as_ref())?;

        Ok(ScheduleResult {
            route_id,
            trip_count: trips.len(),
            matching_stops,
            departures,
        })
    }

    /// Tries the exact tram route id (`T` + line) first, then falls back to
    /// a linear scan for a tram route with a matching short name. First
    /// match in table order wins.
    fn resolve_route(&self, line: &str) -> Result<Arc<str>, Error> {
        let tram_id = format!("T{line}");
        if let Some(route) = self.repository.route_by_id(&tram_id) {
            return Ok(route.id.clone());
        }
        self.repository
            .routes()
            .iter()
            .find(|route| route.short_name.as_ref() == line && route.is_tram())
            .map(|route| route.id.clone())
            .ok_or_else(|| Error::RouteNotFound {
                line: line.to_string(),
            })
    }

    /// Collects trips on the route whose service id contains the day-type
    /// marker, stopping at the trip limit. Returns trip id -> headsign.
    fn select_trips(
        &self,
        route_id: &str,
        pattern: &str,
    ) -> Result<HashMap<Arc<str>, Arc<str>>, Error> {
        let mut trips: HashMap<Arc<str>, Arc<str>> = HashMap::new();
        self.gtfs.scan_trips(|(_, trip)| {
            if trip.route_id == route_id && trip.service_id.contains(pattern) {
                let headsign: Arc<str> = trip.trip_headsign.as_deref().unwrap_or("Unknown").into();
                trips.insert(trip.trip_id.as_str().into(), headsign);
                if trips.len() >= self.trip_limit {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        })?;
        Ok(trips)
    }

    fn collect_departures(
        &self,
        trips: &HashMap<Arc<str>, Arc<str>>,
        stop_filter: Option<&HashSet<&str>>,
    ) -> Result<BTreeMap<Arc<str>, Vec<Departure>>, Error> {
        if trips.len() > 10 {
            debug!("Scanning stop_times for {} trips...", trips.len());
        }
        // BTreeSet keeps (time, headsign) pairs unique and ordered; times
        // sort correctly as strings since they are fixed-width HH:MM:SS.
        let mut by_stop: BTreeMap<Arc<str>, BTreeSet<(String, Arc<str>)>> = BTreeMap::new();
        self.gtfs.stream_stop_times(|(_, stop_time)| {
            let Some(headsign) = trips.get(stop_time.trip_id.as_str()) else {
                return;
            };
            if let Some(filter) = stop_filter
                && !filter.contains(stop_time.stop_id.as_str())
            {
                return;
            }
            by_stop
                .entry(stop_time.stop_id.as_str().into())
                .or_default()
                .insert((stop_time.departure_time, headsign.clone()));
        })?;

        Ok(by_stop
            .into_iter()
            .map(|(stop_id, times)| {
                let departures = times
                    .into_iter()
                    .map(|(time, headsign)| Departure { time, headsign })
                    .collect();
                (stop_id, departures)
            })
            .collect())
    }
}
