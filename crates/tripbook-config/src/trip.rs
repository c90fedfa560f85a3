//! Baseline trip loading.

use std::collections::HashSet;
use std::path::Path;
use tracing::info;
use tripbook_model::Trip;

use crate::config::AppConfig;
use crate::error::{ConfigError, Result};

const BUNDLED_TRIP: &str = include_str!("../data/trip.json");

/// The sample trip shipped with the binary.
pub fn bundled_trip() -> Result<Trip> {
    let trip: Trip = serde_json::from_str(BUNDLED_TRIP).map_err(|e| ConfigError::InvalidTrip {
        path: "<bundled>".into(),
        reason: e.to_string(),
    })?;
    check_day_keys(Path::new("<bundled>"), &trip)?;
    Ok(trip)
}

/// Load a trip from a `.json` or `.toml` file.
pub fn load_trip(path: &Path) -> Result<Trip> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |reason: String| ConfigError::InvalidTrip {
        path: path.to_path_buf(),
        reason,
    };

    let trip: Trip = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        Some("toml") => toml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        _ => return Err(ConfigError::UnsupportedTripFormat(path.to_path_buf())),
    };

    check_day_keys(path, &trip)?;
    info!(path = %path.display(), days = trip.days.len(), "Loaded baseline trip");
    Ok(trip)
}

/// Items are routed to days by key, so keys must be unique.
fn check_day_keys(path: &Path, trip: &Trip) -> Result<()> {
    let mut seen = HashSet::new();
    for day in &trip.days {
        if !seen.insert(day.date.as_str()) {
            return Err(ConfigError::InvalidTrip {
                path: path.to_path_buf(),
                reason: format!("duplicate day key {:?}", day.date),
            });
        }
    }
    Ok(())
}

impl AppConfig {
    /// The configured baseline trip, or the bundled one.
    pub fn load_baseline(&self) -> Result<Trip> {
        match &self.trip.baseline {
            Some(path) => load_trip(path),
            None => bundled_trip(),
        }
    }
}
