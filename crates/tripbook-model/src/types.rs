//! Core schedule types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification tag for an itinerary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Transport,
    Food,
    Hotel,
    Activity,
    Meeting,
    Note,
    Sightseeing,
    Ticket,
}

impl ActivityType {
    /// Every member, in declaration order.
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Transport,
        ActivityType::Food,
        ActivityType::Hotel,
        ActivityType::Activity,
        ActivityType::Meeting,
        ActivityType::Note,
        ActivityType::Sightseeing,
        ActivityType::Ticket,
    ];

    /// The wire tag, e.g. `"TRANSPORT"`.
    pub fn as_tag(&self) -> &'static str {
        match self {
            ActivityType::Transport => "TRANSPORT",
            ActivityType::Food => "FOOD",
            ActivityType::Hotel => "HOTEL",
            ActivityType::Activity => "ACTIVITY",
            ActivityType::Meeting => "MEETING",
            ActivityType::Note => "NOTE",
            ActivityType::Sightseeing => "SIGHTSEEING",
            ActivityType::Ticket => "TICKET",
        }
    }

    /// Look up a member by its exact wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_tag() == tag)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity type: {0}")]
pub struct ParseActivityTypeError(pub String);

impl FromStr for ActivityType {
    type Err = ParseActivityTypeError;

    /// Case-insensitive parse, so `food` and `FOOD` both work on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.trim().to_ascii_uppercase())
            .ok_or_else(|| ParseActivityTypeError(s.to_string()))
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    /// Identity key for upserts; unique within the owning day.
    pub id: String,
    /// `HH:MM`, also used as the sort key. Free-form values such as
    /// `"Check-in"` are allowed and sort lexicographically.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_highlight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Day key of the owning day. Set on items arriving from the live store;
    /// baseline items embedded in their day leave it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ItineraryItem {
    pub fn new(
        id: impl Into<String>,
        time: impl Into<String>,
        title: impl Into<String>,
        activity_type: ActivityType,
    ) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            end_time: None,
            title: title.into(),
            description: None,
            location: None,
            activity_type,
            details: Vec::new(),
            is_highlight: None,
            coordinates: None,
            date: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates::new(lat, lng));
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn highlighted(mut self) -> Self {
        self.is_highlight = Some(true);
        self
    }

    pub fn is_highlight(&self) -> bool {
        self.is_highlight.unwrap_or(false)
    }
}

/// A named, optionally geolocated point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// A category of recommendations, e.g. cafés near the hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<RecommendationItem>,
}

/// One calendar day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Day key, unique across the schedule; incoming items are routed by it.
    pub date: String,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<ItineraryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<RecommendationGroup>>,
}

impl DaySchedule {
    pub fn new(date: impl Into<String>, day_of_week: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            day_of_week: day_of_week.into(),
            title: title.into(),
            items: Vec::new(),
            recommendations: None,
        }
    }

    pub fn with_item(mut self, item: ItineraryItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_recommendations(mut self, groups: Vec<RecommendationGroup>) -> Self {
        self.recommendations = Some(groups);
        self
    }

    pub fn item(&self, id: &str) -> Option<&ItineraryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Recommendation groups, empty when the day has none.
    pub fn recommendation_groups(&self) -> &[RecommendationGroup] {
        self.recommendations.as_deref().unwrap_or(&[])
    }
}

/// The baseline trip document loaded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    #[serde(default)]
    pub days: Vec<DaySchedule>,
}

impl Trip {
    pub fn day(&self, date: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|day| day.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn activity_type_uses_upper_case_tags() {
        let value = serde_json::to_value(ActivityType::Sightseeing).unwrap();
        assert_eq!(value, json!("SIGHTSEEING"));

        let parsed: ActivityType = serde_json::from_value(json!("TICKET")).unwrap();
        assert_eq!(parsed, ActivityType::Ticket);
    }

    #[test]
    fn activity_type_tags_round_trip_through_from_tag() {
        for t in ActivityType::ALL {
            assert_eq!(ActivityType::from_tag(t.as_tag()), Some(t));
        }
        assert_eq!(ActivityType::from_tag("food"), None);
        assert_eq!(ActivityType::from_tag("PARTY"), None);
    }

    #[test]
    fn activity_type_parses_case_insensitively() {
        assert_eq!("food".parse::<ActivityType>().unwrap(), ActivityType::Food);
        assert_eq!(" Hotel ".parse::<ActivityType>().unwrap(), ActivityType::Hotel);
        let err = "party".parse::<ActivityType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown activity type: party");
    }

    #[test]
    fn item_deserializes_from_store_document() {
        let doc = json!({
            "id": "d1-train",
            "time": "08:36",
            "endTime": "09:42",
            "title": "High speed rail 1509",
            "type": "TRANSPORT",
            "details": ["Taipei 08:36", "Taichung 09:42"],
            "isHighlight": true,
            "coordinates": { "lat": 24.112, "lng": 120.6156 },
            "date": "1/1"
        });

        let item: ItineraryItem = serde_json::from_value(doc).unwrap();
        assert_eq!(item.end_time.as_deref(), Some("09:42"));
        assert_eq!(item.activity_type, ActivityType::Transport);
        assert_eq!(item.details.len(), 2);
        assert!(item.is_highlight());
        assert_eq!(item.coordinates, Some(Coordinates::new(24.112, 120.6156)));
        assert_eq!(item.date.as_deref(), Some("1/1"));
    }

    #[test]
    fn item_omits_absent_optional_fields() {
        let item = ItineraryItem::new("x", "09:00", "Breakfast", ActivityType::Food);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({ "id": "x", "time": "09:00", "title": "Breakfast", "type": "FOOD" })
        );
        assert!(!item.is_highlight());
    }

    #[test]
    fn day_schedule_reads_camel_case_and_defaults() {
        let day: DaySchedule = serde_json::from_value(json!({
            "date": "1/2",
            "dayOfWeek": "Fri",
            "title": "Around town"
        }))
        .unwrap();

        assert_eq!(day.day_of_week, "Fri");
        assert!(day.items.is_empty());
        assert!(day.recommendation_groups().is_empty());
    }

    #[test]
    fn trip_loads_from_toml() {
        let trip: Trip = toml::from_str(
            r#"
            title = "New year trip"

            [[days]]
            date = "1/1"
            dayOfWeek = "Thu"
            title = "North to centre"

            [[days.items]]
            id = "d1-hotel"
            time = "Check-in"
            title = "Mu Yun Hotel"
            type = "HOTEL"
            coordinates = { lat = 24.1428, lng = 120.6835 }

            [[days.recommendations]]
            category = "Coffee"
            items = [{ name = "NOD COFFEE BAR", coordinates = { lat = 24.1492, lng = 120.6681 } }]
            "#,
        )
        .unwrap();

        let day = trip.day("1/1").unwrap();
        assert_eq!(day.item("d1-hotel").unwrap().activity_type, ActivityType::Hotel);
        assert_eq!(day.recommendation_groups()[0].items[0].name, "NOD COFFEE BAR");
        assert!(trip.day("1/9").is_none());
    }
}
