//! Activity classification lookups (marker color, legend label).

use crate::types::ActivityType;
use serde::{Serialize, Serializer};
use std::fmt;

/// An sRGB color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Rgb = Rgb::new(0x3b, 0x82, 0xf6);
    pub const PURPLE: Rgb = Rgb::new(0xa8, 0x55, 0xf7);
    pub const ORANGE: Rgb = Rgb::new(0xf9, 0x73, 0x16);
    pub const TEAL: Rgb = Rgb::new(0x0d, 0x94, 0x88);
    pub const YELLOW: Rgb = Rgb::new(0xea, 0xb3, 0x08);
    pub const GREEN: Rgb = Rgb::new(0x22, 0xc5, 0x5e);
    pub const PINK: Rgb = Rgb::new(0xec, 0x48, 0x99);
    pub const SLATE: Rgb = Rgb::new(0x64, 0x74, 0x8b);
    pub const AMBER: Rgb = Rgb::new(0xfb, 0xbf, 0x24);

    pub fn hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color used for notes and for any tag we do not recognise.
pub const FALLBACK_COLOR: Rgb = Rgb::SLATE;

pub fn activity_color(activity: ActivityType) -> Rgb {
    match activity {
        ActivityType::Transport => Rgb::BLUE,
        ActivityType::Hotel => Rgb::PURPLE,
        ActivityType::Food => Rgb::ORANGE,
        ActivityType::Sightseeing => Rgb::TEAL,
        ActivityType::Ticket => Rgb::YELLOW,
        ActivityType::Activity => Rgb::GREEN,
        ActivityType::Meeting => Rgb::PINK,
        ActivityType::Note => FALLBACK_COLOR,
    }
}

pub fn activity_label(activity: ActivityType) -> &'static str {
    match activity {
        ActivityType::Transport => "交通",
        ActivityType::Hotel => "住宿",
        ActivityType::Food => "美食",
        ActivityType::Sightseeing => "景點",
        ActivityType::Ticket => "票券",
        ActivityType::Activity => "活動",
        ActivityType::Meeting => "集合",
        ActivityType::Note => "備註",
    }
}

/// Color for a raw tag as stored remotely; unknown tags get [`FALLBACK_COLOR`].
pub fn activity_color_for_tag(tag: &str) -> Rgb {
    ActivityType::from_tag(tag)
        .map(activity_color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Label for a raw tag; unknown tags are shown as-is.
pub fn activity_label_for_tag(tag: &str) -> String {
    match ActivityType::from_tag(tag) {
        Some(activity) => activity_label(activity).to_string(),
        None => tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn colors_render_as_hex() {
        assert_eq!(activity_color(ActivityType::Transport).hex(), "#3b82f6");
        assert_eq!(activity_color(ActivityType::Hotel).hex(), "#a855f7");
        assert_eq!(activity_color(ActivityType::Food).hex(), "#f97316");
        assert_eq!(activity_color(ActivityType::Sightseeing).hex(), "#0d9488");
        assert_eq!(activity_color(ActivityType::Ticket).hex(), "#eab308");
        assert_eq!(activity_color(ActivityType::Activity).hex(), "#22c55e");
        assert_eq!(activity_color(ActivityType::Meeting).hex(), "#ec4899");
        assert_eq!(activity_color(ActivityType::Note).hex(), "#64748b");
    }

    #[test]
    fn every_member_has_a_distinct_label() {
        let labels: HashSet<_> = ActivityType::ALL.iter().map(|t| activity_label(*t)).collect();
        assert_eq!(labels.len(), ActivityType::ALL.len());
        assert_eq!(activity_label(ActivityType::Meeting), "集合");
    }

    #[test]
    fn unknown_tags_fall_back() {
        assert_eq!(activity_color_for_tag("PARTY"), FALLBACK_COLOR);
        assert_eq!(activity_label_for_tag("PARTY"), "PARTY");
        assert_eq!(activity_color_for_tag("FOOD"), Rgb::ORANGE);
        assert_eq!(activity_label_for_tag("FOOD"), "美食");
    }

    #[test]
    fn rgb_serializes_as_hex_string() {
        let value = serde_json::to_value(Rgb::AMBER).unwrap();
        assert_eq!(value, serde_json::json!("#fbbf24"));
    }
}
