pub struct Config {
    pub routes_path: String,
    pub stops_path: String,
    pub trips_path: String,
    pub stop_times_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routes_path: "routes.txt".into(),
            stops_path: "stops.txt".into(),
            trips_path: "trips.txt".into(),
            stop_times_path: "stop_times.txt".into(),
        }
    }
}

impl Config {
    pub fn table_names(&self) -> [&str; 4] {
        [
            &self.routes_path,
            &self.stops_path,
            &self.trips_path,
            &self.stop_times_path,
        ]
    }
}
