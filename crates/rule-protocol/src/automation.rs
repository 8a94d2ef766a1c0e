//! Automation record schema

use crate::lenient::{
    entries, id_string, null_as_default, optional, or_default, string_or_vec, WireEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trigger kind for wall-clock triggers (`trigger` key)
pub const TRIGGER_TIME: &str = "time";
/// Trigger kind for device state triggers (`trigger` key)
pub const TRIGGER_STATE: &str = "state";
/// Legacy spelling of a device state trigger
pub const TRIGGER_DEVICE: &str = "device";
/// Platform for solar triggers (`platform` key)
pub const PLATFORM_SUN: &str = "sun";

/// An automation as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireAutomation {
    /// Server-assigned identifier, absent on requests
    #[serde(
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Display alias
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub alias: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub description: String,
    /// Run mode (`single`, `restart`, `queued`, `parallel`)
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<String>,
    /// Whether the automation starts enabled
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_state: Option<bool>,
    #[serde(default, deserialize_with = "entries")]
    pub trigger: Vec<WireEntry<WireTrigger>>,
    #[serde(default, deserialize_with = "or_default")]
    pub condition: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "entries")]
    pub action: Vec<WireEntry<WireAction>>,
}

/// Trigger entry
///
/// Wall-clock and state triggers name their kind under `trigger`, solar
/// triggers under `platform`. Every field is optional so that any JSON object
/// decodes; the translator decides whether the combination is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Time of day, `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    /// Solar event, `sunrise` or `sunset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<WireOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Comparison token (`above`, `below`, `equals`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl WireTrigger {
    /// Wall-clock trigger
    pub fn time(at: impl Into<String>) -> Self {
        Self {
            trigger: Some(TRIGGER_TIME.to_string()),
            at: Some(at.into()),
            ..Default::default()
        }
    }

    /// Solar trigger with a signed minute offset
    pub fn sun(event: impl Into<String>, offset_minutes: i64) -> Self {
        Self {
            platform: Some(PLATFORM_SUN.to_string()),
            event: Some(event.into()),
            offset: Some(WireOffset::Minutes(offset_minutes)),
            ..Default::default()
        }
    }

    /// Device state trigger
    pub fn state(
        device_id: impl Into<String>,
        domain: impl Into<String>,
        attribute: impl Into<String>,
        operator: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            trigger: Some(TRIGGER_STATE.to_string()),
            device_id: Some(device_id.into()),
            domain: Some(domain.into()),
            attribute: Some(attribute.into()),
            operator: Some(operator.into()),
            value: Some(value),
            ..Default::default()
        }
    }

    /// Trigger kind, read from `trigger` and falling back to `platform`
    pub fn kind(&self) -> Option<&str> {
        self.trigger.as_deref().or(self.platform.as_deref())
    }
}

/// Solar offset as sent by the backend
///
/// Requests always carry whole minutes; older records may hold a signed
/// `HH:MM:SS` duration string instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireOffset {
    Minutes(i64),
    Text(String),
}

impl WireOffset {
    /// Offset in whole minutes; seconds are truncated toward zero
    pub fn to_minutes(&self) -> Option<i64> {
        match self {
            WireOffset::Minutes(minutes) => Some(*minutes),
            WireOffset::Text(text) => parse_duration_minutes(text),
        }
    }
}

/// Parse `[-+]HH:MM[:SS]` or a bare integer into minutes
fn parse_duration_minutes(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(minutes) = text.parse::<i64>() {
        return Some(minutes);
    }

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let parts: Vec<i64> = body
        .split(':')
        .map(|part| part.parse::<i64>().ok().filter(|n| *n >= 0))
        .collect::<Option<Vec<_>>>()?;

    let minutes = match parts.as_slice() {
        [hours, minutes] => hours.checked_mul(60)?.checked_add(*minutes)?,
        [hours, minutes, seconds] => hours
            .checked_mul(60)?
            .checked_add(*minutes)?
            .checked_add(seconds / 60)?,
        _ => return None,
    };

    Some(if negative { -minutes } else { minutes })
}

/// Service call entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireAction {
    /// Qualified service, `<domain>.<service>`
    #[serde(default, alias = "action", skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WireTarget>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl WireAction {
    /// Service call against a single device
    pub fn device_call(
        domain: &str,
        service: &str,
        device_id: impl Into<String>,
        data: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            service: Some(format!("{domain}.{service}")),
            target: Some(WireTarget {
                device_id: vec![device_id.into()],
            }),
            data,
        }
    }

    /// Split the qualified service into `(domain, service)`
    pub fn split_service(&self) -> Option<(&str, &str)> {
        let (domain, service) = self.service.as_deref()?.split_once('.')?;
        if domain.is_empty() || service.is_empty() {
            return None;
        }
        Some((domain, service))
    }

    /// Device ids addressed by this call
    pub fn device_ids(&self) -> &[String] {
        self.target
            .as_ref()
            .map(|t| t.device_id.as_slice())
            .unwrap_or_default()
    }
}

/// Service call target; only device ids are read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTarget {
    #[serde(default, deserialize_with = "string_or_vec")]
    pub device_id: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sun_trigger_shape() {
        let value = serde_json::to_value(WireTrigger::sun("sunset", -30)).unwrap();
        assert_eq!(
            value,
            json!({ "platform": "sun", "event": "sunset", "offset": -30 })
        );
    }

    #[test]
    fn test_time_trigger_shape() {
        let value = serde_json::to_value(WireTrigger::time("07:30:00")).unwrap();
        assert_eq!(value, json!({ "trigger": "time", "at": "07:30:00" }));
    }

    #[test]
    fn test_trigger_kind_falls_back_to_platform() {
        let trigger: WireTrigger =
            serde_json::from_value(json!({ "platform": "sun", "event": "sunrise" })).unwrap();
        assert_eq!(trigger.kind(), Some("sun"));
        assert_eq!(WireTrigger::time("10:00:00").kind(), Some("time"));
        assert_eq!(WireTrigger::default().kind(), None);
    }

    #[test]
    fn test_offset_text_forms() {
        assert_eq!(WireOffset::Text("-00:30:00".into()).to_minutes(), Some(-30));
        assert_eq!(WireOffset::Text("01:15".into()).to_minutes(), Some(75));
        assert_eq!(WireOffset::Text("+02:00:59".into()).to_minutes(), Some(120));
        assert_eq!(WireOffset::Text("45".into()).to_minutes(), Some(45));
        assert_eq!(WireOffset::Text("soon".into()).to_minutes(), None);
        assert_eq!(WireOffset::Text("-00:-5".into()).to_minutes(), None);
        assert_eq!(
            WireOffset::Text("200000000000000000:00".into()).to_minutes(),
            None
        );
        assert_eq!(
            WireOffset::Text("-1:9223372036854775807:00".into()).to_minutes(),
            None
        );
    }

    #[test]
    fn test_action_shape_omits_empty_data() {
        let action = WireAction::device_call("light", "turn_on", "dev-1", BTreeMap::new());
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "service": "light.turn_on", "target": { "device_id": ["dev-1"] } })
        );
    }

    #[test]
    fn test_action_accepts_action_key_and_single_device() {
        let action: WireAction = serde_json::from_value(json!({
            "action": "cover.open_cover",
            "target": { "device_id": "blind-1" },
            "data": null
        }))
        .unwrap();
        assert_eq!(action.split_service(), Some(("cover", "open_cover")));
        assert_eq!(action.device_ids(), ["blind-1".to_string()]);
        assert!(action.data.is_empty());
    }

    #[test]
    fn test_split_service_rejects_unqualified() {
        let action = WireAction {
            service: Some("turn_on".into()),
            ..Default::default()
        };
        assert_eq!(action.split_service(), None);
        assert_eq!(WireAction::default().split_service(), None);
    }

    #[test]
    fn test_automation_tolerates_missing_lists() {
        let record: WireAutomation = serde_json::from_value(json!({
            "id": "a1",
            "alias": "Morning",
            "description": null,
            "trigger": { "trigger": "time", "at": "07:00:00" }
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("a1"));
        assert_eq!(record.description, "");
        assert_eq!(record.trigger.len(), 1);
        assert!(record.action.is_empty());
        assert!(record.condition.is_empty());
    }

    #[test]
    fn test_automation_recovers_mistyped_fields() {
        let record: WireAutomation = serde_json::from_value(json!({
            "id": 17,
            "alias": ["Morning"],
            "description": 5,
            "mode": 2,
            "initial_state": "on",
            "condition": "always",
            "trigger": { "trigger": "time", "at": "07:00:00" }
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("17"));
        assert_eq!(record.alias, None);
        assert_eq!(record.description, "");
        assert_eq!(record.mode, None);
        assert_eq!(record.initial_state, None);
        assert!(record.condition.is_empty());
        assert_eq!(record.trigger.len(), 1);
    }
}
