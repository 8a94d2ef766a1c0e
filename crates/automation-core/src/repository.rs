//! Automation repository
//!
//! Validates drafts, translates them, and sends them through the transport.
//! Each call is exactly one round-trip; nothing is cached or retried here.

use crate::error::AutomationFailure;
use crate::model::{Automation, AutomationDraft};
use crate::simulation::{self, SimulationResult};
use crate::transport::AutomationTransport;
use crate::translate;
use std::sync::Arc;

/// Submits, lists and simulates automations against the backend
#[derive(Clone)]
pub struct AutomationRepository {
    transport: Arc<dyn AutomationTransport>,
    return_state_matrix: bool,
}

impl AutomationRepository {
    /// Create a repository over a transport
    pub fn new(transport: Arc<dyn AutomationTransport>) -> Self {
        Self {
            transport,
            return_state_matrix: false,
        }
    }

    /// Ask the backend to include its state matrix in simulation responses
    #[must_use]
    pub fn with_state_matrix(mut self, enabled: bool) -> Self {
        self.return_state_matrix = enabled;
        self
    }

    /// Submit a draft; the draft is consumed whatever the outcome
    pub async fn create(&self, draft: AutomationDraft) -> Result<(), AutomationFailure> {
        draft.validate()?;
        let request = translate::to_request(&draft);
        drop(draft);

        self.transport
            .post_automation(&request)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to create automation {:?}: {}", request.alias, e);
                AutomationFailure::from(e)
            })?;

        tracing::info!("Created automation {:?}", request.alias);
        Ok(())
    }

    /// Fetch all automations; undecodable records are skipped
    pub async fn list(&self) -> Result<Vec<Automation>, AutomationFailure> {
        let records = self.transport.get_automations().await.map_err(|e| {
            tracing::warn!("Failed to list automations: {}", e);
            AutomationFailure::from(e)
        })?;

        let total = records.len();
        let automations = translate::automations_from_list(records);
        if automations.len() < total {
            tracing::warn!(
                "Listed {} automations, skipped {} unreadable records",
                automations.len(),
                total - automations.len()
            );
        } else {
            tracing::debug!("Listed {} automations", automations.len());
        }
        Ok(automations)
    }

    /// Dry-run a draft; the draft stays with the caller for further editing
    pub async fn simulate(
        &self,
        draft: &AutomationDraft,
    ) -> Result<SimulationResult, AutomationFailure> {
        draft.validate()?;
        let request = translate::to_request(draft);

        let response = self
            .transport
            .post_simulation(&request, self.return_state_matrix)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to simulate automation '{}': {}", draft.name, e);
                AutomationFailure::from(e)
            })?;

        let result = simulation::to_simulation_result(response);
        tracing::info!(
            "Simulated automation '{}': {} conflicts, {} suggestions",
            draft.name,
            result.conflicts.len(),
            result.suggestions.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NetworkFailure, ValidationFailure};
    use crate::model::{AutomationTrigger, DeviceAction, WeekdaySet};
    use crate::solar::SolarEvent;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use rule_protocol::{WireAutomation, WireEntry, WireSimulationResponse};
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport that records requests and replays canned responses
    #[derive(Default)]
    struct MockTransport {
        posted: Mutex<Vec<WireAutomation>>,
        simulated: Mutex<Vec<(WireAutomation, bool)>>,
        list_calls: Mutex<usize>,
        failure: Option<TransportError>,
        list_response: serde_json::Value,
        simulation_response: serde_json::Value,
    }

    impl MockTransport {
        fn failing(error: TransportError) -> Self {
            Self {
                failure: Some(error),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.posted.lock().unwrap().len()
                + self.simulated.lock().unwrap().len()
                + *self.list_calls.lock().unwrap()
        }

        fn check(&self) -> Result<(), TransportError> {
            match &self.failure {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AutomationTransport for MockTransport {
        async fn post_automation(&self, automation: &WireAutomation) -> Result<(), TransportError> {
            self.posted.lock().unwrap().push(automation.clone());
            self.check()
        }

        async fn get_automations(&self) -> Result<Vec<WireEntry<WireAutomation>>, TransportError> {
            *self.list_calls.lock().unwrap() += 1;
            self.check()?;
            Ok(serde_json::from_value(self.list_response.clone())?)
        }

        async fn post_simulation(
            &self,
            automation: &WireAutomation,
            return_state_matrix: bool,
        ) -> Result<WireSimulationResponse, TransportError> {
            self.simulated
                .lock()
                .unwrap()
                .push((automation.clone(), return_state_matrix));
            self.check()?;
            Ok(serde_json::from_value(self.simulation_response.clone())?)
        }
    }

    fn evening_lights() -> AutomationDraft {
        AutomationDraft::new("Evening lights")
            .with_trigger(
                AutomationTrigger::solar(SolarEvent::Sunset, -30, WeekdaySet::every_day())
                    .unwrap(),
            )
            .with_action(DeviceAction::new("lamp-1", "Lamp", "light", "turn_on"))
    }

    fn repository(transport: &Arc<MockTransport>) -> AutomationRepository {
        AutomationRepository::new(transport.clone())
    }

    #[tokio::test]
    async fn test_create_posts_translated_draft() {
        let transport = Arc::new(MockTransport::default());
        repository(&transport).create(evening_lights()).await.unwrap();

        let posted = transport.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].alias.as_deref(), Some("Evening lights"));
        assert_eq!(posted[0].action.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_drafts_never_reach_transport() {
        let transport = Arc::new(MockTransport::default());
        let repo = repository(&transport);

        let mut blank = evening_lights();
        blank.name = "  ".into();
        assert_eq!(
            repo.create(blank.clone()).await,
            Err(AutomationFailure::Validation(ValidationFailure::EmptyName))
        );
        assert_eq!(
            repo.simulate(&blank).await.unwrap_err(),
            AutomationFailure::Validation(ValidationFailure::EmptyName)
        );

        let mut no_trigger = evening_lights();
        no_trigger.trigger = None;
        assert_eq!(
            repo.create(no_trigger).await,
            Err(AutomationFailure::Validation(ValidationFailure::MissingTrigger))
        );

        let mut no_actions = evening_lights();
        no_actions.actions.clear();
        assert_eq!(
            repo.simulate(&no_actions).await.unwrap_err(),
            AutomationFailure::Validation(ValidationFailure::NoActions)
        );

        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_classifies_transport_failure() {
        let transport = Arc::new(MockTransport::failing(TransportError::Status {
            status: 503,
            body: String::new(),
        }));
        assert_eq!(
            repository(&transport).create(evening_lights()).await,
            Err(AutomationFailure::Network(NetworkFailure::ServerUnavailable))
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_entry_missing_actions() {
        let transport = Arc::new(MockTransport {
            list_response: json!([
                {
                    "id": "1",
                    "alias": "Morning",
                    "trigger": [{ "trigger": "time", "at": "07:00:00" }],
                    "action": [{ "service": "light.turn_on", "target": { "device_id": ["l1"] } }]
                },
                {
                    "id": "2",
                    "alias": "Broken",
                    "trigger": [{ "trigger": "time", "at": "08:00:00" }]
                }
            ]),
            ..Default::default()
        });

        let automations = repository(&transport).list().await.unwrap();
        assert_eq!(automations.len(), 2);
        assert_eq!(automations[0].actions().len(), 1);
        assert!(automations[1].actions().is_empty());
    }

    #[tokio::test]
    async fn test_list_no_connectivity() {
        let transport = Arc::new(MockTransport::failing(TransportError::Timeout));
        assert_eq!(
            repository(&transport).list().await,
            Err(AutomationFailure::Network(NetworkFailure::NoConnectivity))
        );
    }

    #[tokio::test]
    async fn test_list_undecodable_body_is_unknown() {
        let transport = Arc::new(MockTransport {
            list_response: json!({ "error": "not a list" }),
            ..Default::default()
        });
        assert!(matches!(
            repository(&transport).list().await,
            Err(AutomationFailure::Network(NetworkFailure::Unknown(_)))
        ));
    }

    #[tokio::test]
    async fn test_simulate_passes_state_matrix_flag() {
        let transport = Arc::new(MockTransport {
            simulation_response: json!({
                "automation": { "alias": "Evening lights" },
                "conflicts": [],
                "suggestions": [{ "suggestion_type": "shift", "new_activation_time": "18:30" }]
            }),
            ..Default::default()
        });
        let repo = repository(&transport).with_state_matrix(true);

        let draft = evening_lights();
        let result = repo.simulate(&draft).await.unwrap();
        assert!(!result.has_conflicts());
        assert_eq!(result.suggestions.len(), 1);
        assert!(draft.is_valid());

        let simulated = transport.simulated.lock().unwrap();
        assert_eq!(simulated.len(), 1);
        assert!(simulated[0].1);
        assert_eq!(
            simulated[0].0.trigger[0].as_parsed().and_then(|t| t.event.as_deref()),
            Some("sunset")
        );
    }

    #[tokio::test]
    async fn test_simulate_not_found() {
        let transport = Arc::new(MockTransport::failing(TransportError::Status {
            status: 404,
            body: String::new(),
        }));
        assert_eq!(
            repository(&transport).simulate(&evening_lights()).await,
            Err(AutomationFailure::Validation(ValidationFailure::NotFound))
        );
    }
}
