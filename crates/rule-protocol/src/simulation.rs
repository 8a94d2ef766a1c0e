//! Simulation response schema

use crate::automation::WireAutomation;
use crate::lenient::{entries, null_as_default, optional, or_default, WireEntry};
use serde::{Deserialize, Serialize};

/// Response of `POST automation/simulate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSimulationResponse {
    /// The submitted automation as the backend understood it
    #[serde(default, deserialize_with = "or_default")]
    pub automation: WireAutomation,
    #[serde(default, deserialize_with = "entries")]
    pub conflicts: Vec<WireEntry<WireConflict>>,
    #[serde(default, deserialize_with = "entries")]
    pub suggestions: Vec<WireEntry<WireSuggestion>>,
}

/// A clash between the simulated automation and existing behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireConflict {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Affected days; the backend sends names or day numbers
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub days: Option<Vec<serde_json::Value>>,
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub threshold: Option<f64>,
}

/// An improvement proposed by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSuggestion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestion_type: String,
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub new_activation_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_saved_money: Option<f64>,
}
