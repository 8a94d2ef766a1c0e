//! Device action resolution
//!
//! Maps a user gesture on a device to the backend service that performs it.
//! The matches below have no wildcard arm: a new [`DeviceCategory`] does not
//! compile until it is classified here.

use crate::category::DeviceCategory;
use std::fmt;

pub const TURN_ON: &str = "turn_on";
pub const TURN_OFF: &str = "turn_off";
pub const LOCK: &str = "lock";
pub const UNLOCK: &str = "unlock";
pub const OPEN_COVER: &str = "open_cover";
pub const CLOSE_COVER: &str = "close_cover";
pub const PRESS: &str = "press";
pub const MEDIA_PLAY: &str = "media_play";
pub const MEDIA_PAUSE: &str = "media_pause";
pub const MEDIA_NEXT_TRACK: &str = "media_next_track";
pub const MEDIA_PREVIOUS_TRACK: &str = "media_previous_track";

/// Service that flips a device away from its current state
///
/// Buttons have no state and always resolve to `press`.
#[must_use]
pub fn resolve_toggle_service(category: DeviceCategory, is_on: bool) -> &'static str {
    use DeviceCategory::*;

    match category {
        Light | Switch | Outlet | Fan | AirConditioner | Heater | Humidifier | AirPurifier
        | Television | Speaker | MediaPlayer | Desktop | Camera | Thermostat | Sensor | Room
        | Group | Unclassified => {
            if is_on {
                TURN_OFF
            } else {
                TURN_ON
            }
        }
        Lock => {
            if is_on {
                LOCK
            } else {
                UNLOCK
            }
        }
        Blinds | Window | Door | Doorbell => {
            if is_on {
                CLOSE_COVER
            } else {
                OPEN_COVER
            }
        }
        Button => PRESS,
    }
}

/// Play/pause toggle for media devices
#[must_use]
pub fn resolve_play_pause(is_playing: bool) -> &'static str {
    if is_playing {
        MEDIA_PAUSE
    } else {
        MEDIA_PLAY
    }
}

/// Track navigation for media devices
#[must_use]
pub fn resolve_media_nav(is_next: bool) -> &'static str {
    if is_next {
        MEDIA_NEXT_TRACK
    } else {
        MEDIA_PREVIOUS_TRACK
    }
}

/// Fully qualified backend service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceCall {
    pub domain: &'static str,
    pub service: &'static str,
}

impl fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.service)
    }
}

/// Toggle service qualified with the category's domain
#[must_use]
pub fn toggle_call(category: DeviceCategory, is_on: bool) -> ServiceCall {
    ServiceCall {
        domain: category.domain(),
        service: resolve_toggle_service(category, is_on),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_is_total() {
        for category in DeviceCategory::all() {
            for is_on in [true, false] {
                assert!(
                    !resolve_toggle_service(*category, is_on).is_empty(),
                    "{category} has no service for is_on={is_on}"
                );
            }
        }
    }

    #[test]
    fn test_power_togglable() {
        assert_eq!(resolve_toggle_service(DeviceCategory::Light, true), "turn_off");
        assert_eq!(resolve_toggle_service(DeviceCategory::Light, false), "turn_on");
        assert_eq!(resolve_toggle_service(DeviceCategory::Thermostat, true), "turn_off");
        assert_eq!(resolve_toggle_service(DeviceCategory::Unclassified, false), "turn_on");
    }

    #[test]
    fn test_lock() {
        assert_eq!(resolve_toggle_service(DeviceCategory::Lock, true), "lock");
        assert_eq!(resolve_toggle_service(DeviceCategory::Lock, false), "unlock");
    }

    #[test]
    fn test_cover_like() {
        assert_eq!(resolve_toggle_service(DeviceCategory::Blinds, true), "close_cover");
        assert_eq!(resolve_toggle_service(DeviceCategory::Doorbell, false), "open_cover");
    }

    #[test]
    fn test_button_ignores_state() {
        assert_eq!(resolve_toggle_service(DeviceCategory::Button, true), "press");
        assert_eq!(resolve_toggle_service(DeviceCategory::Button, false), "press");
    }

    #[test]
    fn test_media_helpers() {
        assert_eq!(resolve_play_pause(true), "media_pause");
        assert_eq!(resolve_play_pause(false), "media_play");
        assert_eq!(resolve_media_nav(true), "media_next_track");
        assert_eq!(resolve_media_nav(false), "media_previous_track");
    }

    #[test]
    fn test_toggle_call_display() {
        assert_eq!(toggle_call(DeviceCategory::Light, false).to_string(), "light.turn_on");
        assert_eq!(toggle_call(DeviceCategory::Window, true).to_string(), "cover.close_cover");
        assert_eq!(toggle_call(DeviceCategory::Button, false).to_string(), "button.press");
    }
}
