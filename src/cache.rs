use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{engine::ScheduleQuery, state::StateStore};

/// Free-text stop names are capped to this many characters in file names.
pub const MAX_SLUG_LEN: usize = 30;

/// State-store key holding the dataset refresh timestamp.
pub fn dataset_key(namespace: &str) -> String {
    format!("{namespace}:gtfs:timestamp")
}

/// State-store key for one query's cached result.
pub fn query_key(namespace: &str, query: &ScheduleQuery) -> String {
    format!("{namespace}:cache:{}", fingerprint(query))
}

/// SHA-256 over the query triple. Collision resistance makes the digest safe
/// to use directly as a lookup key.
pub fn fingerprint(query: &ScheduleQuery) -> String {
    let input = format!(
        "{}:{}:{}",
        query.line,
        query.stop_name.as_deref().unwrap_or(""),
        query.schedule_type
    );
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// JSON payload recorded in the state store for a cached query result.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub line: String,
    pub stop: String,
    pub schedule_type: String,
    pub text_path: String,
}

/// Returns the cached entry if it is younger than `ttl` and its report file
/// still exists on disk. Anything unparsable counts as a miss.
pub fn lookup(store: &dyn StateStore, key: &str, ttl: Duration) -> Option<CacheEntry> {
    let raw = store.get(key)?;
    let entry: CacheEntry = serde_json::from_str(&raw).ok()?;
    let age = Utc::now().signed_duration_since(entry.timestamp);
    if age >= ttl {
        debug!("Cache entry for {key} expired");
        return None;
    }
    if !Path::new(&entry.text_path).exists() {
        debug!("Cache entry for {key} points at a missing report file");
        return None;
    }
    Some(entry)
}

/// Best-effort write of a fresh cache entry; a failing store is ignored.
pub fn record(store: &dyn StateStore, key: &str, query: &ScheduleQuery, text_path: &Path) {
    let entry = CacheEntry {
        timestamp: Utc::now(),
        line: query.line.clone(),
        stop: query.stop_name.clone().unwrap_or_default(),
        schedule_type: query.schedule_type.to_string(),
        text_path: text_path.display().to_string(),
    };
    if let Ok(value) = serde_json::to_string(&entry) {
        store.set(key, &value);
    }
}

/// File-name fragment for a stop name: lowercased, truncated, spaces
/// stripped. Kept stable so existing report paths remain valid.
pub fn slug(stop_name: &str) -> String {
    let lowered = stop_name.to_lowercase();
    let truncated: String = lowered.chars().take(MAX_SLUG_LEN).collect();
    truncated.replace(' ', "")
}

/// Dated path for a new report file:
/// `<data_dir>/<year>/<month>/<day>/<timestamp>-line<line>-<slug>.txt`.
pub fn report_path(
    data_dir: &Path,
    line: &str,
    stop_name: Option<&str>,
    now: DateTime<Local>,
) -> PathBuf {
    let day_dir = data_dir.join(now.format("%Y/%m/%d").to_string());
    let stamp = now.format("%Y%m%d-%H%M%S");
    let slug = match stop_name {
        Some(name) if !name.is_empty() => slug(name),
        _ => "all".to_string(),
    };
    day_dir.join(format!("{stamp}-line{line}-{slug}.txt"))
}
