//! Simulation API request and response types

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::staging::TransactionTemplate;

pub const SIMULATION_TYPE_FULL: &str = "full";

/// Request body for the simulate endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRequest {
    /// Keep the run in the project dashboard
    pub save: bool,
    pub save_if_fails: bool,
    pub simulation_type: String,
    pub network_id: String,
    pub from: Address,
    pub to: Address,
    /// Hex-encoded calldata with 0x prefix
    pub input: String,
    pub gas: u64,
    #[serde(serialize_with = "crate::domain_types::uint256::serialize")]
    pub gas_price: U256,
    #[serde(serialize_with = "crate::domain_types::uint256::serialize")]
    pub value: U256,
}

impl SimulationRequest {
    pub fn new(candidate: &TransactionTemplate, from: Address, chain_id: u64) -> Self {
        Self {
            save: true,
            save_if_fails: false,
            simulation_type: SIMULATION_TYPE_FULL.to_string(),
            network_id: chain_id.to_string(),
            from,
            to: candidate.to,
            input: candidate.data_hex(),
            gas: candidate.gas,
            gas_price: candidate.gas_price,
            value: candidate.value,
        }
    }
}

/// Subset of the simulate response the bot reads
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationResponse {
    pub transaction: SimulatedTransaction,
    #[serde(default)]
    pub simulation: Option<SimulationInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulatedTransaction {
    pub status: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationInfo {
    pub id: String,
}

/// What the stager needs to know about a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Whether the transaction would succeed
    pub accepted: bool,
    /// Revert reason reported by the simulator
    pub error_message: Option<String>,
    /// Id of the saved run, if it was saved
    pub simulation_id: Option<String>,
}

#[cfg(test)]
impl SimulationOutcome {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            error_message: None,
            simulation_id: None,
        }
    }

    pub fn reverted(reason: Option<String>) -> Self {
        Self {
            accepted: false,
            error_message: reason,
            simulation_id: None,
        }
    }
}

impl From<SimulationResponse> for SimulationOutcome {
    fn from(response: SimulationResponse) -> Self {
        Self {
            accepted: response.transaction.status,
            error_message: response.transaction.error_message.filter(|m| !m.is_empty()),
            simulation_id: response.simulation.map(|s| s.id),
        }
    }
}
