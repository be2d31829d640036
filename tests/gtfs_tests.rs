mod common;

use std::ops::ControlFlow;
use tramvia::gtfs::{self, GtfsReader};

#[test]
fn streams_all_route_rows() {
    let dir = tempfile::tempdir().unwrap();
    common::write_gtfs_fixture(dir.path());
    let gtfs = GtfsReader::new(dir.path());

    let mut routes = Vec::new();
    gtfs.stream_routes(|(_, route)| routes.push(route)).unwrap();

    assert_eq!(routes.len(), 3);
    assert_eq!(routes[0].route_id, "T9");
    assert_eq!(routes[0].route_type, 0);
    assert_eq!(routes[1].route_id, "B70");
    assert_eq!(routes[1].route_type, 3);
}

#[test]
fn streams_stops_with_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    common::write_gtfs_fixture(dir.path());
    let gtfs = GtfsReader::new(dir.path());

    let mut stops = Vec::new();
    gtfs.stream_stops(|(_, stop)| stops.push(stop)).unwrap();

    assert_eq!(stops.len(), 3);
    assert_eq!(stops[0].stop_name, "Piazza Firenze");
    assert_eq!(stops[0].stop_lat, Some(45.49));
}

#[test]
fn trip_scan_stops_when_callback_breaks() {
    let dir = tempfile::tempdir().unwrap();
    common::write_gtfs_fixture(dir.path());
    let gtfs = GtfsReader::new(dir.path());

    let mut seen = 0;
    gtfs.scan_trips(|(_, _)| {
        seen += 1;
        if seen == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .unwrap();

    assert_eq!(seen, 2);
}

#[test]
fn table_names_can_be_overridden() {
    let dir = tempfile::tempdir().unwrap();
    common::write_gtfs_fixture(dir.path());
    std::fs::rename(dir.path().join("routes.txt"), dir.path().join("linee.txt")).unwrap();
    let gtfs = GtfsReader::new(dir.path()).with_config(gtfs::Config {
        routes_path: "linee.txt".into(),
        ..Default::default()
    });

    let mut count = 0;
    gtfs.stream_routes(|_| count += 1).unwrap();
    assert_eq!(count, 3);
}

#[test]
fn missing_table_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // Dataset directory exists but holds no tables.
    let gtfs = GtfsReader::new(dir.path());

    let err = gtfs.stream_routes(|_| {}).unwrap_err();
    assert!(matches!(err, gtfs::Error::FileNotFound(_)));
}

#[test]
fn malformed_row_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    common::write_gtfs_fixture(dir.path());
    std::fs::write(
        dir.path().join("routes.txt"),
        "route_id,route_short_name,route_long_name,route_type\n\
         T9,9,Tram 9,not-a-number\n",
    )
    .unwrap();
    let gtfs = GtfsReader::new(dir.path());

    let err = gtfs.stream_routes(|_| {}).unwrap_err();
    assert!(matches!(err, gtfs::Error::Csv(_)));
}

#[test]
fn extra_columns_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(
        dir.path().join("stop_times.txt"),
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
         TR1,05:59:30,06:00:00,S1,1\n",
    )
    .unwrap();
    let gtfs = GtfsReader::new(dir.path());

    let mut rows = Vec::new();
    gtfs.stream_stop_times(|(_, row)| rows.push(row)).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].departure_time, "06:00:00");
    assert_eq!(rows[0].stop_id, "S1");
}
