//! Staging data types

use chrono::{DateTime, Utc};
use ethers::types::{Address, Bytes, Transaction, H256, U256};

use crate::error::QuickTaskError;
use crate::simulation::SimulationOutcome;

/// Immutable template of a transaction fetched by hash.
///
/// Only the fields needed to rebuild the call are kept; the original nonce and
/// signature are discarded since the operator re-signs as sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTemplate {
    /// Hash of the original transaction
    pub hash: H256,
    /// Original signer, informational only
    pub from: Address,
    pub to: Address,
    /// Value in wei
    pub value: U256,
    /// Gas limit
    pub gas: u64,
    /// Gas price in wei, echoed from the original transaction
    pub gas_price: U256,
    pub data: Bytes,
}

impl TransactionTemplate {
    /// Upper bound of what the transaction can spend: value + gas * gas_price
    pub fn cost(&self) -> U256 {
        self.value
            .saturating_add(U256::from(self.gas).saturating_mul(self.gas_price))
    }

    /// Hex-encoded calldata with 0x prefix
    pub fn data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }
}

impl TryFrom<Transaction> for TransactionTemplate {
    type Error = QuickTaskError;

    fn try_from(tx: Transaction) -> Result<Self, Self::Error> {
        let to = tx.to.ok_or_else(|| {
            QuickTaskError::UnsupportedTransaction(
                "contract creation transactions cannot be staged".to_string(),
            )
        })?;

        // Mined EIP-1559 transactions report the effective price as gasPrice
        let gas_price = tx.gas_price.or(tx.max_fee_per_gas).ok_or_else(|| {
            QuickTaskError::UnsupportedTransaction("transaction has no gas price".to_string())
        })?;

        if tx.gas > U256::from(u64::MAX) {
            return Err(QuickTaskError::UnsupportedTransaction(format!(
                "gas limit {} is out of range",
                tx.gas
            )));
        }

        Ok(Self {
            hash: tx.hash,
            from: tx.from,
            to,
            value: tx.value,
            gas: tx.gas.as_u64(),
            gas_price,
            data: tx.input,
        })
    }
}

/// The transaction occupying the pending slot
#[derive(Debug, Clone)]
pub struct StagedTransaction {
    pub template: TransactionTemplate,
    /// Outcome of the simulation that admitted this entry
    pub simulation: SimulationOutcome,
    /// When the entry was admitted
    pub staged_at: DateTime<Utc>,
    /// When the expiry task clears the entry
    pub expires_at: DateTime<Utc>,
    /// Token identifying this admission; a newer stage always gets a larger one
    pub generation: u64,
}

impl StagedTransaction {
    /// Seconds left before expiry, zero once expired
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
