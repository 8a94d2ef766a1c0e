//! Simulation results
//!
//! Conflicts and suggestions are computed by the backend; this module only
//! carries its verdict into domain types.

use crate::model::Automation;
use crate::translate;
use rule_protocol::{WireConflict, WireEntry, WireSimulationResponse, WireSuggestion};
use serde::Serialize;

/// A clash between the simulated automation and the rest of the home
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationConflict {
    /// Backend type tag
    pub kind: String,
    pub description: String,
    pub threshold: Option<f64>,
    /// Days the clash occurs on, as reported; empty when not day-specific
    pub days: Vec<String>,
}

/// An improvement the backend proposes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationSuggestion {
    /// Backend type tag
    pub kind: String,
    /// Proposed activation time, as sent by the backend
    pub new_activation_time: Option<String>,
    pub monthly_saved_money: Option<f64>,
}

/// Verdict of a dry run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub automation: Automation,
    pub conflicts: Vec<AutomationConflict>,
    pub suggestions: Vec<AutomationSuggestion>,
}

impl SimulationResult {
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Translate the backend's simulation response
#[must_use]
pub fn to_simulation_result(response: WireSimulationResponse) -> SimulationResult {
    SimulationResult {
        automation: translate::from_wire(response.automation),
        conflicts: parsed_entries(response.conflicts, "conflict")
            .map(conflict_from_wire)
            .collect(),
        suggestions: parsed_entries(response.suggestions, "suggestion")
            .map(suggestion_from_wire)
            .collect(),
    }
}

fn parsed_entries<T>(
    entries: Vec<WireEntry<T>>,
    what: &'static str,
) -> impl Iterator<Item = T> {
    entries.into_iter().filter_map(move |entry| match entry {
        WireEntry::Parsed(value) => Some(value),
        WireEntry::Malformed(raw) => {
            tracing::warn!("Skipping malformed simulation {}: {}", what, raw);
            None
        }
    })
}

fn conflict_from_wire(wire: WireConflict) -> AutomationConflict {
    let days = wire
        .days
        .unwrap_or_default()
        .into_iter()
        .map(|day| match day {
            serde_json::Value::String(name) => name,
            other => other.to_string(),
        })
        .collect();

    AutomationConflict {
        kind: wire.kind,
        description: wire.description,
        threshold: wire.threshold,
        days,
    }
}

fn suggestion_from_wire(wire: WireSuggestion) -> AutomationSuggestion {
    AutomationSuggestion {
        kind: wire.suggestion_type,
        new_activation_time: wire.new_activation_time,
        monthly_saved_money: wire.monthly_saved_money,
    }
}
