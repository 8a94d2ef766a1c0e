//! Data models for automations

use crate::error::ValidationFailure;
use crate::solar::{self, SolarEvent};
use chrono::NaiveTime;
use device_core::{resolve_media_nav, resolve_play_pause, resolve_toggle_service, DeviceCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Day of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }
}

/// Ordered, duplicate-free set of weekdays; empty means every day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdaySet(Vec<Weekday>);

impl WeekdaySet {
    /// Every day of the week
    #[must_use]
    pub fn every_day() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_every_day(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.is_every_day() || self.0.binary_search(&day).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(mut days: Vec<Weekday>) -> Self {
        days.sort_unstable();
        days.dedup();
        Self(days)
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.0
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_every_day() {
            return f.write_str("every day");
        }
        let names: Vec<&str> = self.iter().map(Weekday::short_name).collect();
        f.write_str(&names.join(", "))
    }
}

/// Scalar parameter value (service data, state comparisons)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Convert a JSON value; arrays, objects and null are not scalars
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// How the rule engine handles a trigger while a previous run is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Single,
    Restart,
    Queued,
    Parallel,
}

impl RunMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Restart => "restart",
            Self::Queued => "queued",
            Self::Parallel => "parallel",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "single" => Some(Self::Single),
            "restart" => Some(Self::Restart),
            "queued" => Some(Self::Queued),
            "parallel" => Some(Self::Parallel),
            _ => None,
        }
    }
}

/// What starts an automation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutomationTrigger {
    /// Fixed time of day
    Time {
        /// Wall-clock time, `HH:MM:SS`
        at: NaiveTime,
        #[serde(default)]
        weekdays: WeekdaySet,
    },
    /// Sunrise or sunset, shifted by a preset offset
    Solar {
        event: SolarEvent,
        /// Minutes relative to the event; negative is before
        offset_minutes: i32,
        #[serde(default)]
        weekdays: WeekdaySet,
    },
    /// A device attribute crossing or matching a value
    DeviceState {
        device_id: String,
        device_name: String,
        /// Backend domain of the device (e.g. "sensor")
        domain: String,
        attribute: String,
        /// Comparison token: "above", "below", "equals"
        operator: String,
        value: ParamValue,
    },
}

impl AutomationTrigger {
    pub fn time(at: NaiveTime, weekdays: WeekdaySet) -> Self {
        Self::Time { at, weekdays }
    }

    /// Solar trigger; the offset must be one of [`solar::presets`]
    pub fn solar(
        event: SolarEvent,
        offset_minutes: i32,
        weekdays: WeekdaySet,
    ) -> Result<Self, ValidationFailure> {
        if !solar::is_preset(offset_minutes) {
            return Err(invalid_offset(offset_minutes));
        }
        Ok(Self::Solar {
            event,
            offset_minutes,
            weekdays,
        })
    }

    /// Check the trigger's own content
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        match self {
            Self::Time { .. } => Ok(()),
            Self::Solar { offset_minutes, .. } => {
                if solar::is_preset(*offset_minutes) {
                    Ok(())
                } else {
                    Err(invalid_offset(*offset_minutes))
                }
            }
            Self::DeviceState {
                device_id,
                attribute,
                operator,
                value,
                ..
            } => {
                require("trigger device", device_id)?;
                require("trigger attribute", attribute)?;
                require("trigger operator", operator)?;
                require_finite("trigger value", value)
            }
        }
    }

    /// One-line description for lists
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Time { at, weekdays } => {
                format!("At {}, {weekdays}", at.format("%H:%M"))
            }
            Self::Solar {
                event,
                offset_minutes,
                weekdays,
            } => format!(
                "{}, {weekdays}",
                solar::offset_label(*event, *offset_minutes)
            ),
            Self::DeviceState {
                device_name,
                attribute,
                operator,
                value,
                ..
            } => format!("When {device_name} {attribute} {operator} {value}"),
        }
    }
}

fn invalid_offset(offset_minutes: i32) -> ValidationFailure {
    ValidationFailure::InvalidDraft(format!(
        "solar offset {offset_minutes} min is not an allowed preset"
    ))
}

/// JSON has no NaN or infinity; such a value would be sent as `null`
fn require_finite(field: &str, value: &ParamValue) -> Result<(), ValidationFailure> {
    match value {
        ParamValue::Float(x) if !x.is_finite() => Err(ValidationFailure::InvalidDraft(format!(
            "{field} {x} is not a finite number"
        ))),
        ParamValue::Bool(_) | ParamValue::Int(_) | ParamValue::Float(_) | ParamValue::Text(_) => {
            Ok(())
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), ValidationFailure> {
    if value.trim().is_empty() {
        return Err(ValidationFailure::InvalidDraft(format!("{field} is empty")));
    }
    Ok(())
}

/// A backend service call against one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAction {
    pub device_id: String,
    pub device_name: String,
    /// Backend verb, e.g. "turn_on"
    pub service: String,
    /// Backend category, e.g. "light"
    pub domain: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

impl DeviceAction {
    pub fn new(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        domain: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            service: service.into(),
            domain: domain.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Flip a device away from its current state
    pub fn toggle(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        category: DeviceCategory,
        is_on: bool,
    ) -> Self {
        Self::new(
            device_id,
            device_name,
            category.domain(),
            resolve_toggle_service(category, is_on),
        )
    }

    /// Play or pause a media device
    pub fn play_pause(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        is_playing: bool,
    ) -> Self {
        Self::new(
            device_id,
            device_name,
            DeviceCategory::MediaPlayer.domain(),
            resolve_play_pause(is_playing),
        )
    }

    /// Skip to the next or previous track
    pub fn media_nav(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        is_next: bool,
    ) -> Self {
        Self::new(
            device_id,
            device_name,
            DeviceCategory::MediaPlayer.domain(),
            resolve_media_nav(is_next),
        )
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// `<domain>.<service>`
    #[must_use]
    pub fn qualified_service(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }

    pub fn validate(&self) -> Result<(), ValidationFailure> {
        require("action device", &self.device_id)?;
        require("action domain", &self.domain)?;
        require("action service", &self.service)?;
        if self.domain.contains('.') {
            return Err(ValidationFailure::InvalidDraft(format!(
                "action domain '{}' contains '.'",
                self.domain
            )));
        }
        for (key, value) in &self.parameters {
            require_finite(&format!("action parameter '{key}'"), value)?;
        }
        Ok(())
    }
}

/// What an automation does when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutomationAction {
    /// Call a service on a device
    Device(DeviceAction),
}

impl AutomationAction {
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        match self {
            Self::Device(action) => action.validate(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Device(action) => {
                format!("{}: {}", action.device_name, action.qualified_service())
            }
        }
    }
}

impl From<DeviceAction> for AutomationAction {
    fn from(action: DeviceAction) -> Self {
        Self::Device(action)
    }
}

/// An automation being authored, not yet accepted by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub trigger: Option<AutomationTrigger>,
    #[serde(default)]
    pub actions: Vec<AutomationAction>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub mode: RunMode,
}

fn default_active() -> bool {
    true
}

impl Default for AutomationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            trigger: None,
            actions: Vec::new(),
            active: default_active(),
            mode: RunMode::default(),
        }
    }
}

impl AutomationDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Seed a draft from a confirmed automation for editing
    ///
    /// Only the first trigger is kept; drafts hold at most one.
    #[must_use]
    pub fn from_automation(automation: &Automation) -> Self {
        Self {
            name: automation.name.clone(),
            description: automation.description.clone(),
            trigger: automation.triggers.first().cloned(),
            actions: automation.actions.clone(),
            active: automation.active,
            mode: automation.mode,
        }
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: AutomationTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<AutomationAction>) -> Self {
        self.actions.push(action.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Remove and return the action at `index`, if present
    pub fn remove_action(&mut self, index: usize) -> Option<AutomationAction> {
        (index < self.actions.len()).then(|| self.actions.remove(index))
    }

    /// First rule the draft violates
    ///
    /// Structural rules are checked first, in a fixed order: name, trigger,
    /// actions. Content of the trigger and each action is checked after.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        if self.name.trim().is_empty() {
            return Err(ValidationFailure::EmptyName);
        }
        let Some(trigger) = &self.trigger else {
            return Err(ValidationFailure::MissingTrigger);
        };
        if self.actions.is_empty() {
            return Err(ValidationFailure::NoActions);
        }
        trigger.validate()?;
        self.actions.iter().try_for_each(AutomationAction::validate)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// An automation confirmed by the backend
///
/// Only produced by translating backend records; see [`crate::translate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Automation {
    id: String,
    name: String,
    description: String,
    active: bool,
    mode: RunMode,
    triggers: Vec<AutomationTrigger>,
    actions: Vec<AutomationAction>,
}

impl Automation {
    pub(crate) fn new(
        id: String,
        name: String,
        description: String,
        active: bool,
        mode: RunMode,
        triggers: Vec<AutomationTrigger>,
        actions: Vec<AutomationAction>,
    ) -> Self {
        debug_assert!(!id.is_empty());
        Self {
            id,
            name,
            description,
            active,
            mode,
            triggers,
            actions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn triggers(&self) -> &[AutomationTrigger] {
        &self.triggers
    }

    pub fn actions(&self) -> &[AutomationAction] {
        &self.actions
    }
}
