//! Tenderly simulation client

use async_trait::async_trait;
use ethers::types::Address;
use reqwest::{header, Client, StatusCode};

use super::types::{SimulationOutcome, SimulationRequest, SimulationResponse};
use super::Simulator;
use crate::config::Config;
use crate::error::QuickTaskError;
use crate::staging::TransactionTemplate;

const ACCESS_KEY_HEADER: &str = "X-Access-Key";
const DASHBOARD_BASE_URL: &str = "https://dashboard.tenderly.co";

/// Simulator backed by the Tenderly simulate endpoint
pub struct TenderlySimulator {
    client: Client,
    endpoint: String,
    access_key: String,
    account: String,
    project: String,
    chain_id: u64,
}

impl TenderlySimulator {
    pub fn new(
        client: Client,
        api_url: &str,
        account: &str,
        project: &str,
        access_key: &str,
        chain_id: u64,
    ) -> Self {
        Self {
            client,
            endpoint: simulate_endpoint(api_url, account, project),
            access_key: access_key.to_string(),
            account: account.to_string(),
            project: project.to_string(),
            chain_id,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            crate::http::shared_client().clone(),
            &config.tenderly_api_url,
            &config.tenderly_account,
            &config.tenderly_project,
            &config.tenderly_access_token,
            config.chain_id,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Dashboard prefix for saved simulations; append a simulation id
    pub fn dashboard_url(&self) -> String {
        format!("{}/{}/{}/simulator", DASHBOARD_BASE_URL, self.account, self.project)
    }
}

/// `{api_url}/account/{account}/project/{project}/simulate`
pub fn simulate_endpoint(api_url: &str, account: &str, project: &str) -> String {
    format!(
        "{}/account/{}/project/{}/simulate",
        api_url.trim_end_matches('/'),
        account,
        project
    )
}

/// Interpret a raw HTTP response from the simulate endpoint
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<SimulationOutcome, QuickTaskError> {
    if !status.is_success() {
        return Err(QuickTaskError::SimulationApi {
            status: status.as_u16(),
            body: truncate(body, 300),
        });
    }

    let response: SimulationResponse = serde_json::from_str(body)
        .map_err(|e| QuickTaskError::Network(format!("Invalid simulation response: {}", e)))?;

    Ok(response.into())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[async_trait]
impl Simulator for TenderlySimulator {
    async fn simulate(
        &self,
        candidate: &TransactionTemplate,
        from: Address,
    ) -> Result<SimulationOutcome, QuickTaskError> {
        log::info!("[Simulation] Simulating {:?} -> {:?}", candidate.hash, candidate.to);

        let request = SimulationRequest::new(candidate, from, self.chain_id);

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(ACCESS_KEY_HEADER, &self.access_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| QuickTaskError::Network(format!("Simulation request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QuickTaskError::Network(format!("Failed to read simulation response: {}", e)))?;

        let outcome = parse_response(status, &body)?;

        match &outcome.simulation_id {
            Some(id) => log::info!(
                "[Simulation] {:?} accepted={} ({}/{})",
                candidate.hash,
                outcome.accepted,
                self.dashboard_url(),
                id
            ),
            None => log::info!("[Simulation] {:?} accepted={}", candidate.hash, outcome.accepted),
        }

        Ok(outcome)
    }
}
