//! Solar trigger offsets
//!
//! The rule engine only accepts offsets from a fixed vocabulary of minutes
//! around sunrise and sunset. [`presets`] is that vocabulary, in the order the
//! UI presents it.

use serde::{Deserialize, Serialize};
use std::fmt;

const PRESETS: [i32; 15] = [
    -240, -180, -120, -60, -45, -30, -15, 0, 15, 30, 45, 60, 120, 180, 240,
];

/// Solar event a trigger is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarEvent {
    Sunrise,
    Sunset,
}

impl SolarEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
        }
    }

    /// Parse the wire token, ignoring case
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "sunrise" => Some(Self::Sunrise),
            "sunset" => Some(Self::Sunset),
            _ => None,
        }
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permitted offsets in minutes, ascending
#[must_use]
pub fn presets() -> &'static [i32] {
    &PRESETS
}

/// Whether `offset_minutes` is one of the permitted offsets
#[must_use]
pub fn is_preset(offset_minutes: i32) -> bool {
    PRESETS.binary_search(&offset_minutes).is_ok()
}

/// Human label for an offset, e.g. "30 min before sunset"
#[must_use]
pub fn offset_label(event: SolarEvent, offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return format!("At {event}");
    }
    let relation = if offset_minutes < 0 { "before" } else { "after" };
    format!(
        "{} {relation} {event}",
        format_minutes(offset_minutes.unsigned_abs())
    )
}

fn format_minutes(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_fixed() {
        let presets = presets();
        assert_eq!(presets.len(), 15);
        assert!(presets.contains(&0));
        assert_eq!(presets.first(), Some(&-240));
        assert_eq!(presets.last(), Some(&240));
        assert!(presets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_is_preset() {
        assert!(is_preset(-30));
        assert!(is_preset(0));
        assert!(is_preset(180));
        assert!(!is_preset(-20));
        assert!(!is_preset(90));
        assert!(!is_preset(300));
    }

    #[test]
    fn test_offset_label() {
        assert_eq!(offset_label(SolarEvent::Sunset, 0), "At sunset");
        assert_eq!(
            offset_label(SolarEvent::Sunset, -30),
            "30 min before sunset"
        );
        assert_eq!(offset_label(SolarEvent::Sunrise, 120), "2 h after sunrise");
        assert_eq!(
            offset_label(SolarEvent::Sunrise, -90),
            "1 h 30 min before sunrise"
        );
    }

    #[test]
    fn test_event_tokens() {
        assert_eq!(SolarEvent::from_token("Sunset"), Some(SolarEvent::Sunset));
        assert_eq!(SolarEvent::from_token("noon"), None);
        assert_eq!(SolarEvent::Sunrise.to_string(), "sunrise");
    }
}
