//! Map plan: what a geocoded-points renderer should draw.
//!
//! Nothing here talks to a tile server or a widget toolkit. [`MapPlan::build`]
//! turns a schedule and the active filters into numbered stop markers,
//! de-duplicated recommendation markers, a route polyline and an initial
//! view. The plan serializes to JSON for whatever renders it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tripbook_model::{activity_color, ActivityType, Coordinates, DaySchedule, Rgb};

const NAVIGATION_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// Padding ratio applied to marker bounds before fitting the view.
pub const FIT_PADDING: f64 = 0.25;

/// Zoom used when the plan has exactly one stop.
pub const SINGLE_STOP_ZOOM: f64 = 12.0;

/// An axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl MapBounds {
    pub fn new(south_west: Coordinates, north_east: Coordinates) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest rectangle containing every point; `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        points.into_iter().fold(None, |bounds, p| {
            Some(match bounds {
                None => Self::new(p, p),
                Some(b) => Self::new(
                    Coordinates::new(b.south_west.lat.min(p.lat), b.south_west.lng.min(p.lng)),
                    Coordinates::new(b.north_east.lat.max(p.lat), b.north_east.lng.max(p.lng)),
                ),
            })
        })
    }

    /// Grow each side by `ratio` of the span along that axis.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_buffer = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Self::new(
            Coordinates::new(self.south_west.lat - lat_buffer, self.south_west.lng - lng_buffer),
            Coordinates::new(self.north_east.lat + lat_buffer, self.north_east.lng + lng_buffer),
        )
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// Nearest point inside the bounds.
    pub fn clamp(&self, point: Coordinates) -> Coordinates {
        Coordinates::new(
            point.lat.clamp(self.south_west.lat, self.north_east.lat),
            point.lng.clamp(self.south_west.lng, self.north_east.lng),
        )
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// Renderer defaults, read from the `[map]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub default_center: Coordinates,
    pub default_zoom: f64,
    pub max_bounds: MapBounds,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: Coordinates::new(23.5, 120.8),
            default_zoom: 7.5,
            max_bounds: MapBounds::new(Coordinates::new(21.5, 119.0), Coordinates::new(25.5, 122.5)),
        }
    }
}

/// A numbered marker for a geolocated itinerary item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopMarker {
    /// 1-based position among the stops that passed the filter.
    pub number: usize,
    pub item_id: String,
    pub day: String,
    pub time: String,
    pub title: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub color: Rgb,
    pub coordinates: Coordinates,
    pub navigation_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationMarker {
    pub name: String,
    pub category: String,
    pub coordinates: Coordinates,
    pub navigation_url: String,
}

/// Initial camera position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MapView {
    FitBounds { bounds: MapBounds },
    Center { center: Coordinates, zoom: f64 },
    Default { center: Coordinates, zoom: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPlan {
    pub stops: Vec<StopMarker>,
    pub recommendations: Vec<RecommendationMarker>,
    pub route: Vec<Coordinates>,
    pub view: MapView,
    pub max_bounds: MapBounds,
}

impl MapPlan {
    pub fn build(
        schedule: &[DaySchedule],
        filters: &HashSet<ActivityType>,
        settings: &MapSettings,
    ) -> Self {
        let stops: Vec<StopMarker> = schedule
            .iter()
            .flat_map(|day| day.items.iter().map(move |item| (day, item)))
            .filter(|(_, item)| filters.contains(&item.activity_type))
            .filter_map(|(day, item)| item.coordinates.map(|point| (day, item, point)))
            .enumerate()
            .map(|(index, (day, item, point))| StopMarker {
                number: index + 1,
                item_id: item.id.clone(),
                day: day.date.clone(),
                time: item.time.clone(),
                title: item.title.clone(),
                location: item.location.clone(),
                activity_type: item.activity_type,
                color: activity_color(item.activity_type),
                coordinates: point,
                navigation_url: navigation_url(point),
            })
            .collect();

        let mut seen = HashSet::new();
        let mut recommendations = Vec::new();
        for day in schedule {
            for group in day.recommendation_groups() {
                for rec in &group.items {
                    let Some(point) = rec.coordinates else { continue };
                    if !seen.insert((point.lat.to_bits(), point.lng.to_bits())) {
                        continue;
                    }
                    recommendations.push(RecommendationMarker {
                        name: rec.name.clone(),
                        category: group.category.clone(),
                        coordinates: point,
                        navigation_url: navigation_url(point),
                    });
                }
            }
        }

        let route: Vec<Coordinates> = stops.iter().map(|stop| stop.coordinates).collect();
        let view = initial_view(&stops, &recommendations, settings);

        Self {
            stops,
            recommendations,
            route,
            view,
            max_bounds: settings.max_bounds,
        }
    }
}

fn initial_view(
    stops: &[StopMarker],
    recommendations: &[RecommendationMarker],
    settings: &MapSettings,
) -> MapView {
    match stops {
        [] => MapView::Default {
            center: settings.default_center,
            zoom: settings.default_zoom,
        },
        [only] => MapView::Center {
            center: only.coordinates,
            zoom: SINGLE_STOP_ZOOM,
        },
        _ => {
            let points = stops
                .iter()
                .map(|s| s.coordinates)
                .chain(recommendations.iter().map(|r| r.coordinates));
            match MapBounds::from_points(points) {
                Some(bounds) => MapView::FitBounds {
                    bounds: bounds.pad(FIT_PADDING),
                },
                None => MapView::Default {
                    center: settings.default_center,
                    zoom: settings.default_zoom,
                },
            }
        }
    }
}

/// Turn-by-turn directions link for a point.
pub fn navigation_url(point: Coordinates) -> String {
    format!("{}{},{}", NAVIGATION_URL, point.lat, point.lng)
}
