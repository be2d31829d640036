use std::{fs, path::Path};

/// Writes a small four-table GTFS dataset into `dir`.
///
/// Line 9 exists as route `T9` (tram), line 15 only via its short name
/// (tram, exercises the fallback), line 70 is a bus and must never resolve.
/// Weekday service carries trips TR1 (Centrale) and TR2 (Genova), Saturday
/// TR3, Sunday TR5 on line 15.
pub fn write_gtfs_fixture(dir: &Path) {
    fs::create_dir_all(dir).unwrap();

    fs::write(
        dir.join("routes.txt"),
        "route_id,route_short_name,route_long_name,route_type\n\
         T9,9,Tram 9 Centrale - Genova,0\n\
         B70,70,Bus 70,3\n\
         15,15,Tram 15 Duomo,0\n",
    )
    .unwrap();

    fs::write(
        dir.join("stops.txt"),
        "stop_id,stop_name,stop_lat,stop_lon\n\
         S1,Piazza Firenze,45.49,9.15\n\
         S2,Centrale FS,45.48,9.20\n\
         S3,Porta Genova,45.45,9.17\n",
    )
    .unwrap();

    fs::write(
        dir.join("trips.txt"),
        "route_id,service_id,trip_id,trip_headsign\n\
         T9,WINTER LV 01,TR1,Centrale\n\
         T9,WINTER LV 01,TR2,Genova\n\
         T9,WINTER SAB 01,TR3,Centrale\n\
         B70,WINTER LV 01,TR4,Elsewhere\n\
         15,WINTER FEST 01,TR5,Duomo\n",
    )
    .unwrap();

    // TR1 appears twice at S1 with the same time to exercise dedup; the
    // Genova direction has seven departures at S2 so the report needs a
    // second row of times; 25:01:00 checks next-day string ordering.
    fs::write(
        dir.join("stop_times.txt"),
        "trip_id,stop_id,departure_time\n\
         TR1,S1,06:00:00\n\
         TR1,S1,06:00:00\n\
         TR2,S1,06:05:00\n\
         TR1,S2,06:10:00\n\
         TR2,S2,06:20:00\n\
         TR2,S2,06:30:00\n\
         TR2,S2,06:40:00\n\
         TR2,S2,06:50:00\n\
         TR2,S2,07:10:00\n\
         TR2,S2,07:20:00\n\
         TR2,S2,25:01:00\n\
         TR3,S1,07:00:00\n\
         TR5,S3,09:00:00\n",
    )
    .unwrap();
}
