//! Schedule data model for tripbook.
//!
//! This crate holds the shapes every other tripbook crate agrees on:
//!
//! - **[`DaySchedule`]**: one calendar day, keyed by its `date` string (e.g. `"1/1"`)
//! - **[`ItineraryItem`]**: a timed event inside a day, identified by `id`
//! - **[`RecommendationGroup`]**: static, categorised points of interest for a day
//! - **[`Trip`]**: the baseline document (title plus the ordered list of days)
//!
//! It also provides the activity classification lookups ([`classify`]) used by
//! legends, stats and map markers.
//!
//! The JSON shape matches what the live store delivers: camelCase field names,
//! `type` for the activity tag and optional fields omitted when absent.

pub mod classify;
pub mod types;

pub use classify::{
    activity_color, activity_color_for_tag, activity_label, activity_label_for_tag, Rgb,
    FALLBACK_COLOR,
};
pub use types::{
    ActivityType, Coordinates, DaySchedule, ItineraryItem, ParseActivityTypeError,
    RecommendationGroup, RecommendationItem, Trip,
};
