//! Transaction simulation
//!
//! A staged transaction is only admitted after a dry run against forked chain state
//! predicts success. The dry run is delegated to Tenderly's simulation API.
//!
//! ## Outcomes
//! - `Ok(accepted = true)`: the transaction would succeed
//! - `Ok(accepted = false)`: the transaction would revert (a normal outcome)
//! - `Err(..)`: the simulation itself could not be run or read

mod client;
mod types;

pub use client::TenderlySimulator;
pub use types::SimulationOutcome;

use async_trait::async_trait;
use ethers::types::Address;

use crate::error::QuickTaskError;
use crate::staging::TransactionTemplate;

/// Runs a candidate transaction without broadcasting it
#[async_trait]
pub trait Simulator: Send + Sync {
    /// Simulate `candidate` as if sent by `from`
    async fn simulate(
        &self,
        candidate: &TransactionTemplate,
        from: Address,
    ) -> Result<SimulationOutcome, QuickTaskError>;
}
