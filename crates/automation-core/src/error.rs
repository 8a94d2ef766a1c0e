//! Failure classification for automation operations

use crate::transport::TransportError;
use thiserror::Error;

/// Why a draft or request was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Draft name is empty or whitespace
    #[error("Automation name is empty")]
    EmptyName,

    /// Draft has no trigger
    #[error("Automation has no trigger")]
    MissingTrigger,

    /// Draft has no actions
    #[error("Automation has no actions")]
    NoActions,

    /// Draft content is not acceptable (bad offset, blank device, rejected by server)
    #[error("Invalid automation: {0}")]
    InvalidDraft(String),

    /// Backend does not know the addressed automation
    #[error("Automation not found")]
    NotFound,
}

/// Why the backend could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkFailure {
    /// Backend unreachable or request timed out
    #[error("No connectivity")]
    NoConnectivity,

    /// Backend answered with a server-side error
    #[error("Server unavailable")]
    ServerUnavailable,

    /// Anything else (unexpected status, unreadable response)
    #[error("Unknown network failure: {0}")]
    Unknown(String),
}

/// Failure surfaced by the automation repository
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomationFailure {
    #[error("Network failure: {0}")]
    Network(#[from] NetworkFailure),

    #[error("Validation failure: {0}")]
    Validation(#[from] ValidationFailure),
}

impl AutomationFailure {
    /// Message suitable for showing to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(NetworkFailure::NoConnectivity) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Network(NetworkFailure::ServerUnavailable) => {
                "The server is unavailable right now. Try again later.".to_string()
            }
            Self::Network(NetworkFailure::Unknown(_)) => {
                "Something went wrong while talking to the server.".to_string()
            }
            Self::Validation(ValidationFailure::EmptyName) => {
                "Give the automation a name.".to_string()
            }
            Self::Validation(ValidationFailure::MissingTrigger) => {
                "Choose what starts the automation.".to_string()
            }
            Self::Validation(ValidationFailure::NoActions) => {
                "Add at least one action.".to_string()
            }
            Self::Validation(ValidationFailure::InvalidDraft(reason)) => {
                format!("The automation is not valid: {reason}")
            }
            Self::Validation(ValidationFailure::NotFound) => {
                "The automation no longer exists.".to_string()
            }
        }
    }
}

impl From<TransportError> for AutomationFailure {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Connect(_) | TransportError::Timeout => {
                NetworkFailure::NoConnectivity.into()
            }
            TransportError::Status { status: 404, .. } => ValidationFailure::NotFound.into(),
            TransportError::Status {
                status: 400 | 422,
                body,
            } => ValidationFailure::InvalidDraft(body).into(),
            TransportError::Status {
                status: 500..=599, ..
            } => NetworkFailure::ServerUnavailable.into(),
            other @ (TransportError::Status { .. } | TransportError::Decode(_)) => {
                NetworkFailure::Unknown(other.to_string()).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> TransportError {
        TransportError::Status {
            status: code,
            body: "nope".to_string(),
        }
    }

    #[test]
    fn test_connectivity_errors() {
        assert_eq!(
            AutomationFailure::from(TransportError::Timeout),
            AutomationFailure::Network(NetworkFailure::NoConnectivity)
        );
        assert_eq!(
            AutomationFailure::from(TransportError::Connect("refused".into())),
            AutomationFailure::Network(NetworkFailure::NoConnectivity)
        );
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            AutomationFailure::from(status(503)),
            AutomationFailure::Network(NetworkFailure::ServerUnavailable)
        );
        assert_eq!(
            AutomationFailure::from(status(500)),
            AutomationFailure::Network(NetworkFailure::ServerUnavailable)
        );
        assert_eq!(
            AutomationFailure::from(status(404)),
            AutomationFailure::Validation(ValidationFailure::NotFound)
        );
        assert_eq!(
            AutomationFailure::from(status(422)),
            AutomationFailure::Validation(ValidationFailure::InvalidDraft("nope".into()))
        );
        assert!(matches!(
            AutomationFailure::from(status(401)),
            AutomationFailure::Network(NetworkFailure::Unknown(_))
        ));
    }

    #[test]
    fn test_decode_is_unknown() {
        assert!(matches!(
            AutomationFailure::from(TransportError::Decode("eof".into())),
            AutomationFailure::Network(NetworkFailure::Unknown(_))
        ));
    }

    #[test]
    fn test_every_failure_has_a_message() {
        let failures = [
            AutomationFailure::from(NetworkFailure::NoConnectivity),
            AutomationFailure::from(NetworkFailure::ServerUnavailable),
            AutomationFailure::from(NetworkFailure::Unknown("x".into())),
            AutomationFailure::from(ValidationFailure::EmptyName),
            AutomationFailure::from(ValidationFailure::MissingTrigger),
            AutomationFailure::from(ValidationFailure::NoActions),
            AutomationFailure::from(ValidationFailure::InvalidDraft("x".into())),
            AutomationFailure::from(ValidationFailure::NotFound),
        ];
        for failure in failures {
            assert!(!failure.user_message().is_empty());
        }
    }
}
