//! Transport collaborator contract
//!
//! The repository never speaks HTTP itself. Implementations own connection
//! handling, authentication headers and timeouts, and report failures as
//! [`TransportError`] for the repository to classify.

use async_trait::async_trait;
use rule_protocol::{WireAutomation, WireEntry, WireSimulationResponse};
use thiserror::Error;

/// Errors reported by a transport implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(error: serde_json::Error) -> Self {
        TransportError::Decode(error.to_string())
    }
}

/// Backend endpoints used by the automation repository
#[async_trait]
pub trait AutomationTransport: Send + Sync {
    /// `POST automation`; any response body is accepted
    async fn post_automation(&self, automation: &WireAutomation) -> Result<(), TransportError>;

    /// `GET automation`; records that fail to decode come back as malformed entries
    async fn get_automations(&self) -> Result<Vec<WireEntry<WireAutomation>>, TransportError>;

    /// `POST automation/simulate?return_state_matrix=<bool>`
    async fn post_simulation(
        &self,
        automation: &WireAutomation,
        return_state_matrix: bool,
    ) -> Result<WireSimulationResponse, TransportError>;
}
