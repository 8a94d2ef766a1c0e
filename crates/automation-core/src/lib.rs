//! Automation rules for the Wattnest client
//!
//! Provides the domain model for user-authored automations (triggers,
//! actions, drafts), translation to and from the rule engine's wire schema,
//! and a repository that submits, lists and simulates automations through a
//! pluggable transport.

pub mod error;
pub mod model;
pub mod repository;
pub mod simulation;
pub mod solar;
pub mod translate;
pub mod transport;

pub use error::{AutomationFailure, NetworkFailure, ValidationFailure};
pub use model::*;
pub use repository::AutomationRepository;
pub use simulation::{AutomationConflict, AutomationSuggestion, SimulationResult};
pub use solar::SolarEvent;
pub use transport::{AutomationTransport, TransportError};
