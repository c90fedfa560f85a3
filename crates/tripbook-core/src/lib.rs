//! Pure helpers consumed by tripbook's presentation layer.
//!
//! - [`geo`]: haversine distance, route length, distance formatting
//! - [`stats`]: location/type/distance totals for the stats panel
//! - [`search`]: first-match schedule search and its debounced wrapper
//! - [`debounce`]: trailing-edge debouncer on the Tokio timer
//! - [`map`]: marker, route and initial-view descriptions for a map renderer

pub mod debounce;
pub mod geo;
pub mod map;
pub mod search;
pub mod stats;

pub use debounce::Debouncer;
pub use geo::{format_distance, haversine_distance_km, total_route_distance_km, EARTH_RADIUS_KM};
pub use map::{
    navigation_url, MapBounds, MapPlan, MapSettings, MapView, RecommendationMarker, StopMarker,
};
pub use search::{find_first_match, DebouncedSearch, SEARCH_DEBOUNCE};
pub use stats::TripStats;
