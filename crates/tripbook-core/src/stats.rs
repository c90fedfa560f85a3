//! Trip statistics for the stats panel.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tripbook_model::{ActivityType, Coordinates, DaySchedule};

use crate::geo::{format_distance, total_route_distance_km};

/// Totals over a schedule, restricted to the active activity filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripStats {
    /// Geolocated items passing the filter plus every geolocated
    /// recommendation (recommendations are not filtered by type).
    pub total_locations: usize,
    /// Route length through the filtered item coordinates, in schedule order.
    pub total_distance_km: f64,
    pub type_counts: BTreeMap<ActivityType, usize>,
    pub days: usize,
}

impl TripStats {
    pub fn compute(schedule: &[DaySchedule], filters: &HashSet<ActivityType>) -> Self {
        let mut total_locations = 0;
        let mut type_counts = BTreeMap::new();
        let mut coordinates: Vec<Coordinates> = Vec::new();

        for day in schedule {
            for item in &day.items {
                let Some(point) = item.coordinates else { continue };
                if !filters.contains(&item.activity_type) {
                    continue;
                }
                total_locations += 1;
                *type_counts.entry(item.activity_type).or_insert(0) += 1;
                coordinates.push(point);
            }

            total_locations += day
                .recommendation_groups()
                .iter()
                .flat_map(|group| group.items.iter())
                .filter(|rec| rec.coordinates.is_some())
                .count();
        }

        Self {
            total_locations,
            total_distance_km: total_route_distance_km(&coordinates),
            type_counts,
            days: schedule.len(),
        }
    }

    /// Share of `total_locations` taken by one type, in percent.
    pub fn share(&self, activity: ActivityType) -> f64 {
        if self.total_locations == 0 {
            return 0.0;
        }
        let count = self.type_counts.get(&activity).copied().unwrap_or(0);
        count as f64 / self.total_locations as f64 * 100.0
    }

    pub fn formatted_distance(&self) -> String {
        format_distance(self.total_distance_km)
    }
}
