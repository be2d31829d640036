use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    config::TIMES_PER_ROW,
    dataset::TIMESTAMP_FORMAT,
    engine::{ScheduleQuery, ScheduleResult},
    repository::Repository,
};

/// Renders a query result as the human-readable report. Pure: deterministic
/// for fixed inputs apart from the `queried_at` instant the caller passes
/// in. Writing the text anywhere is the caller's job.
pub fn format(
    query: &ScheduleQuery,
    result: &ScheduleResult,
    repository: &Repository,
    queried_at: DateTime<Utc>,
) -> String {
    let stop_name = query.stop_name.as_deref().unwrap_or("");
    let mut lines: Vec<String> = vec![
        "=== ATM Tram Schedule (GTFS) ===".into(),
        format!("Line: {}", query.line),
        format!(
            "Stop: {}",
            if stop_name.is_empty() {
                "all stops"
            } else {
                stop_name
            }
        ),
        format!("Schedule Type: {}", query.schedule_type),
        format!("Queried At: {}", queried_at.format(TIMESTAMP_FORMAT)),
        "Data Source: GTFS Static Feed".into(),
        String::new(),
        format!("Route ID: {}", result.route_id),
        String::new(),
        format!("=== Trips for {} ===", query.schedule_type),
        format!("Found {} trips", result.trip_count),
        String::new(),
    ];

    if !stop_name.is_empty() && !result.matching_stops.is_empty() {
        lines.push(format!("=== Stops matching '{stop_name}' ==="));
        lines.push(format!(
            "Found {} matching stops:",
            result.matching_stops.len()
        ));
        for stop_id in &result.matching_stops {
            let name = repository
                .stop_by_id(stop_id)
                .map(|stop| stop.name.as_ref())
                .unwrap_or("Unknown");
            lines.push(format!("  {stop_id}: {name}"));
        }
        lines.push(String::new());
    }

    lines.push("=== Departure Times ===".into());
    lines.push(String::new());

    if result.departures.is_empty() {
        lines.push("No departure times found.".into());
    } else {
        for (stop_id, departures) in &result.departures {
            let display = repository
                .stop_by_id(stop_id)
                .map(|stop| stop.name.as_ref())
                .unwrap_or(stop_id.as_ref());
            lines.push(format!("Stop: {display} ({stop_id})"));
            lines.push(format!("Departures: {} scheduled", departures.len()));
            lines.push(String::new());

            // Departures arrive sorted by time, so per-direction lists stay
            // in time order; BTreeMap sorts the direction labels.
            let mut by_direction: BTreeMap<&Arc<str>, Vec<&str>> = BTreeMap::new();
            for departure in departures {
                by_direction
                    .entry(&departure.headsign)
                    .or_default()
                    .push(&departure.time);
            }

            for (direction, times) in by_direction {
                lines.push(format!("  Direction: {direction}"));
                lines.push(format!("  ({} departures)", times.len()));
                lines.push(String::new());
                for row in times.chunks(TIMES_PER_ROW) {
                    lines.push(format!("    {}", row.join("  ")));
                }
                lines.push(String::new());
            }
        }
    }

    lines.extend([
        "=== Note ===".into(),
        "This data is from GTFS static feed (scheduled times, not real-time).".into(),
        "Times shown are in HH:MM:SS format.".into(),
        "For real-time data, the ATM API is currently unavailable due to access restrictions."
            .into(),
    ]);

    lines.join("\n")
}
