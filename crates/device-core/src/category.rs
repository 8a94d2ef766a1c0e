//! Device categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Device category as classified by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Light,
    Switch,
    Outlet,
    Fan,
    AirConditioner,
    Heater,
    Humidifier,
    AirPurifier,
    Television,
    Speaker,
    MediaPlayer,
    Desktop,
    Camera,
    Thermostat,
    Sensor,
    Room,
    Group,
    Lock,
    Blinds,
    Window,
    Door,
    Doorbell,
    Button,
    Unclassified,
}

/// Error returned when parsing an unrecognised category token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown device category: {0}")]
pub struct UnknownCategory(pub String);

impl DeviceCategory {
    /// Every category, in declaration order
    #[must_use]
    pub fn all() -> &'static [DeviceCategory] {
        use DeviceCategory::*;
        &[
            Light,
            Switch,
            Outlet,
            Fan,
            AirConditioner,
            Heater,
            Humidifier,
            AirPurifier,
            Television,
            Speaker,
            MediaPlayer,
            Desktop,
            Camera,
            Thermostat,
            Sensor,
            Room,
            Group,
            Lock,
            Blinds,
            Window,
            Door,
            Doorbell,
            Button,
            Unclassified,
        ]
    }

    /// Snake-case token used on the wire and on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Outlet => "outlet",
            Self::Fan => "fan",
            Self::AirConditioner => "air_conditioner",
            Self::Heater => "heater",
            Self::Humidifier => "humidifier",
            Self::AirPurifier => "air_purifier",
            Self::Television => "television",
            Self::Speaker => "speaker",
            Self::MediaPlayer => "media_player",
            Self::Desktop => "desktop",
            Self::Camera => "camera",
            Self::Thermostat => "thermostat",
            Self::Sensor => "sensor",
            Self::Room => "room",
            Self::Group => "group",
            Self::Lock => "lock",
            Self::Blinds => "blinds",
            Self::Window => "window",
            Self::Door => "door",
            Self::Doorbell => "doorbell",
            Self::Button => "button",
            Self::Unclassified => "unclassified",
        }
    }

    /// Backend domain that owns services for this category
    ///
    /// Rooms, groups and unclassified devices go through the generic
    /// `homeassistant` domain, which fans out to whatever the target holds.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Switch | Self::Outlet | Self::Desktop => "switch",
            Self::Fan | Self::AirPurifier => "fan",
            Self::AirConditioner | Self::Heater | Self::Thermostat => "climate",
            Self::Humidifier => "humidifier",
            Self::Television | Self::Speaker | Self::MediaPlayer => "media_player",
            Self::Camera => "camera",
            Self::Sensor => "sensor",
            Self::Room | Self::Group | Self::Unclassified => "homeassistant",
            Self::Lock => "lock",
            Self::Blinds | Self::Window | Self::Door | Self::Doorbell => "cover",
            Self::Button => "button",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == token)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
