//! HTTP transport for the automation backend

use crate::config::Config;
use async_trait::async_trait;
use automation_core::{AutomationTransport, TransportError};
use reqwest::{Client, RequestBuilder, Response};
use rule_protocol::{WireAutomation, WireEntry, WireSimulationResponse};
use url::Url;

const AUTOMATION_PATH: &str = "automation";
const SIMULATE_PATH: &str = "automation/simulate";

/// reqwest-backed [`AutomationTransport`]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport from client configuration
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Connect(format!("{path}: {e}")))
    }

    fn simulate_url(&self, return_state_matrix: bool) -> Result<Url, TransportError> {
        let mut url = self.endpoint(SIMULATE_PATH)?;
        url.query_pairs_mut()
            .append_pair("return_state_matrix", if return_state_matrix { "true" } else { "false" });
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend request failed: {} - {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Map reqwest's error kinds onto transport errors
fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_decode() {
        TransportError::Decode(error.to_string())
    } else {
        TransportError::Connect(error.to_string())
    }
}

#[async_trait]
impl AutomationTransport for HttpTransport {
    async fn post_automation(&self, automation: &WireAutomation) -> Result<(), TransportError> {
        let url = self.endpoint(AUTOMATION_PATH)?;
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).json(automation)).await?;
        Ok(())
    }

    async fn get_automations(&self) -> Result<Vec<WireEntry<WireAutomation>>, TransportError> {
        let url = self.endpoint(AUTOMATION_PATH)?;
        tracing::debug!("GET {}", url);
        self.send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(classify)
    }

    async fn post_simulation(
        &self,
        automation: &WireAutomation,
        return_state_matrix: bool,
    ) -> Result<WireSimulationResponse, TransportError> {
        let url = self.simulate_url(return_state_matrix)?;
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).json(automation))
            .await?
            .json()
            .await
            .map_err(classify)
    }
}
