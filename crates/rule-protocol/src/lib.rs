//! Wire schema for the automation backend
//!
//! This crate describes the JSON documents exchanged with the rule engine:
//! automation records, their trigger/action entries, and simulation
//! responses. It carries no domain rules. Decoding is lenient: a damaged entry
//! decodes as [`WireEntry::Malformed`] instead of failing the whole document.

pub mod automation;
pub mod lenient;
pub mod simulation;

pub use automation::{WireAction, WireAutomation, WireOffset, WireTarget, WireTrigger};
pub use lenient::WireEntry;
pub use simulation::{WireConflict, WireSimulationResponse, WireSuggestion};
