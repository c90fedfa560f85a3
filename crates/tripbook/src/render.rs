//! Plain-text rendering for the terminal.

use std::fmt::Write;
use tripbook_core::TripStats;
use tripbook_model::{activity_label, ActivityType, DaySchedule, ItineraryItem, Trip};

/// Trip header: title, subtitle and the shared map link.
pub fn trip_header(trip: &Trip) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", trip.title);
    if !trip.subtitle.is_empty() {
        let _ = writeln!(out, "{}", trip.subtitle);
    }
    if let Some(link) = &trip.map_link {
        let _ = writeln!(out, "Map: {}", link);
    }
    out
}

/// One item line, followed by its description and details.
pub fn item(item: &ItineraryItem) -> String {
    let mut out = String::new();

    let time = match &item.end_time {
        Some(end) => format!("{} - {}", item.time, end),
        None => item.time.clone(),
    };
    let marker = if item.is_highlight() { "*" } else { " " };
    let _ = write!(
        out,
        "{} {:<15} [{}] {}",
        marker,
        time,
        activity_label(item.activity_type),
        item.title
    );
    if let Some(location) = &item.location {
        let _ = write!(out, " @ {}", location);
    }
    out.push('\n');

    if let Some(description) = &item.description {
        let _ = writeln!(out, "    {}", description);
    }
    for detail in &item.details {
        let _ = writeln!(out, "    - {}", detail);
    }
    out
}

/// A day block with items in list order and its recommendations.
pub fn day(day: &DaySchedule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ({}) {}", day.date, day.day_of_week, day.title);
    for entry in &day.items {
        out.push_str(&item(entry));
    }

    for group in day.recommendation_groups() {
        let names: Vec<&str> = group.items.iter().map(|rec| rec.name.as_str()).collect();
        let _ = writeln!(out, "  {}: {}", group.category, names.join(", "));
    }
    out
}

pub fn schedule(days: &[DaySchedule]) -> String {
    days.iter().map(day).collect::<Vec<_>>().join("\n")
}

pub fn stats(stats: &TripStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Days:      {}", stats.days);
    let _ = writeln!(out, "Locations: {}", stats.total_locations);
    let _ = writeln!(out, "Distance:  {}", stats.formatted_distance());

    for activity in ActivityType::ALL {
        let Some(count) = stats.type_counts.get(&activity) else { continue };
        let _ = writeln!(
            out,
            "  {:<4} {:>3}  {:>5.1}%",
            activity_label(activity),
            count,
            stats.share(activity)
        );
    }
    out
}
