//! Translation between automations and the rule engine's wire schema
//!
//! Not everything survives a trip through the wire schema:
//! - weekday sets on time and solar triggers (the schema has no field for them)
//! - device display names (the wire only carries device ids)
//! - non-scalar service data values
//! - conditions and non-device actions sent by the backend
//! - actions addressed only by entity id (the target is read for device ids only)
//!
//! Decoding never fails. Entries that cannot be understood are logged and
//! skipped so that one damaged record does not hide the rest.

use crate::model::{
    Automation, AutomationAction, AutomationDraft, AutomationTrigger, DeviceAction, ParamValue,
    RunMode, WeekdaySet,
};
use crate::solar::SolarEvent;
use chrono::NaiveTime;
use rule_protocol::automation::{PLATFORM_SUN, TRIGGER_DEVICE, TRIGGER_STATE, TRIGGER_TIME};
use rule_protocol::{WireAction, WireAutomation, WireEntry, WireTrigger};
use std::collections::BTreeMap;

/// Id given to records the backend sent without one (simulation echoes)
pub const UNSAVED_ID: &str = "unsaved";

const DEFAULT_ATTRIBUTE: &str = "state";
const DEFAULT_OPERATOR: &str = "equals";

/// Build the request body for a draft
///
/// The draft must be valid; check [`AutomationDraft::is_valid`] first.
#[must_use]
pub fn to_request(draft: &AutomationDraft) -> WireAutomation {
    debug_assert!(draft.is_valid(), "to_request called with an invalid draft");

    WireAutomation {
        id: None,
        alias: Some(draft.name.clone()),
        name: Some(draft.name.clone()),
        description: draft.description.clone(),
        mode: Some(draft.mode.as_str().to_string()),
        initial_state: Some(draft.active),
        trigger: draft.trigger.iter().map(trigger_to_wire).collect(),
        condition: Vec::new(),
        action: draft.actions.iter().map(action_to_wire).collect(),
    }
}

/// Wire form of a confirmed automation, keeping its id
#[must_use]
pub fn automation_to_wire(automation: &Automation) -> WireAutomation {
    let id = (automation.id() != UNSAVED_ID).then(|| automation.id().to_string());

    WireAutomation {
        id,
        alias: Some(automation.name().to_string()),
        name: Some(automation.name().to_string()),
        description: automation.description().to_string(),
        mode: Some(automation.mode().as_str().to_string()),
        initial_state: Some(automation.is_active()),
        trigger: automation.triggers().iter().map(trigger_to_wire).collect(),
        condition: Vec::new(),
        action: automation.actions().iter().map(action_to_wire).collect(),
    }
}

fn trigger_to_wire(trigger: &AutomationTrigger) -> WireEntry<WireTrigger> {
    let wire = match trigger {
        AutomationTrigger::Time { at, .. } => WireTrigger::time(at.format("%H:%M:%S").to_string()),
        AutomationTrigger::Solar {
            event,
            offset_minutes,
            ..
        } => WireTrigger::sun(event.as_str(), i64::from(*offset_minutes)),
        AutomationTrigger::DeviceState {
            device_id,
            domain,
            attribute,
            operator,
            value,
            ..
        } => WireTrigger::state(
            device_id.as_str(),
            domain.as_str(),
            attribute.as_str(),
            operator.as_str(),
            value.to_json(),
        ),
    };
    WireEntry::Parsed(wire)
}

fn action_to_wire(action: &AutomationAction) -> WireEntry<WireAction> {
    let wire = match action {
        AutomationAction::Device(device) => {
            let data = device
                .parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect();
            WireAction::device_call(&device.domain, &device.service, device.device_id.as_str(), data)
        }
    };
    WireEntry::Parsed(wire)
}

/// Translate a backend record, substituting defaults for missing fields
#[must_use]
pub fn from_wire(record: WireAutomation) -> Automation {
    let id = record
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| UNSAVED_ID.to_string());
    let name = record
        .name
        .filter(|name| !name.trim().is_empty())
        .or(record.alias)
        .unwrap_or_default();
    let mode = match record.mode.as_deref() {
        None => RunMode::default(),
        Some(token) => RunMode::from_token(token).unwrap_or_else(|| {
            tracing::debug!("Unknown mode '{}' on automation {}, using single", token, id);
            RunMode::default()
        }),
    };

    if !record.condition.is_empty() {
        tracing::debug!(
            "Ignoring {} conditions on automation {}",
            record.condition.len(),
            id
        );
    }

    let triggers = record
        .trigger
        .into_iter()
        .filter_map(|entry| match entry {
            WireEntry::Parsed(wire) => {
                let trigger = trigger_from_wire(&wire);
                if trigger.is_none() {
                    tracing::warn!(
                        "Skipping unusable {:?} trigger on automation {}",
                        wire.kind(),
                        id
                    );
                }
                trigger
            }
            WireEntry::Malformed(raw) => {
                tracing::warn!("Skipping malformed trigger on automation {}: {}", id, raw);
                None
            }
        })
        .collect();

    let actions = record
        .action
        .into_iter()
        .flat_map(|entry| actions_from_wire(entry, &id))
        .collect();

    Automation::new(
        id,
        name,
        record.description,
        record.initial_state.unwrap_or(true),
        mode,
        triggers,
        actions,
    )
}

/// Translate a list response, dropping records that did not decode at all
#[must_use]
pub fn automations_from_list(records: Vec<WireEntry<WireAutomation>>) -> Vec<Automation> {
    records
        .into_iter()
        .filter_map(|entry| match entry {
            WireEntry::Parsed(record) => Some(from_wire(record)),
            WireEntry::Malformed(raw) => {
                tracing::warn!("Skipping malformed automation record: {}", raw);
                None
            }
        })
        .collect()
}

fn trigger_from_wire(wire: &WireTrigger) -> Option<AutomationTrigger> {
    match wire.kind()? {
        TRIGGER_TIME => {
            let at = parse_time(wire.at.as_deref()?)?;
            Some(AutomationTrigger::Time {
                at,
                weekdays: WeekdaySet::every_day(),
            })
        }
        PLATFORM_SUN => {
            let event = SolarEvent::from_token(wire.event.as_deref()?)?;
            let offset_minutes = match &wire.offset {
                None => 0,
                Some(offset) => i32::try_from(offset.to_minutes()?).ok()?,
            };
            Some(AutomationTrigger::Solar {
                event,
                offset_minutes,
                weekdays: WeekdaySet::every_day(),
            })
        }
        TRIGGER_STATE | TRIGGER_DEVICE => {
            let device_id = wire.device_id.clone().filter(|id| !id.trim().is_empty())?;
            let value = ParamValue::from_json(wire.value.as_ref()?)?;
            Some(AutomationTrigger::DeviceState {
                device_name: device_id.clone(),
                device_id,
                domain: wire.domain.clone().unwrap_or_default(),
                attribute: wire
                    .attribute
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ATTRIBUTE.to_string()),
                operator: wire
                    .operator
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPERATOR.to_string()),
                value,
            })
        }
        _ => None,
    }
}

fn actions_from_wire(entry: WireEntry<WireAction>, automation_id: &str) -> Vec<AutomationAction> {
    let action = match entry {
        WireEntry::Parsed(action) => action,
        WireEntry::Malformed(raw) => {
            tracing::warn!(
                "Skipping malformed action on automation {}: {}",
                automation_id,
                raw
            );
            return Vec::new();
        }
    };

    let Some((domain, service)) = action.split_service() else {
        tracing::warn!(
            "Skipping action without a qualified service on automation {}",
            automation_id
        );
        return Vec::new();
    };

    let parameters: BTreeMap<String, ParamValue> = action
        .data
        .iter()
        .filter_map(|(key, value)| {
            let param = ParamValue::from_json(value);
            if param.is_none() {
                tracing::debug!("Dropping non-scalar parameter '{}' of {}.{}", key, domain, service);
            }
            param.map(|p| (key.clone(), p))
        })
        .collect();

    let actions: Vec<AutomationAction> = action
        .device_ids()
        .iter()
        .filter(|id| !id.trim().is_empty())
        .map(|device_id| {
            AutomationAction::Device(DeviceAction {
                device_id: device_id.clone(),
                device_name: device_id.clone(),
                service: service.to_string(),
                domain: domain.to_string(),
                parameters: parameters.clone(),
            })
        })
        .collect();

    if actions.is_empty() {
        tracing::warn!(
            "Skipping {}.{} action without a device target on automation {}",
            domain,
            service,
            automation_id
        );
    }
    actions
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
