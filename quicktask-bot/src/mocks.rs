//! In-memory collaborators for unit tests

use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::broadcast::TxSender;
use crate::chain::ChainClient;
use crate::error::QuickTaskError;
use crate::simulation::{SimulationOutcome, Simulator};
use crate::staging::TransactionTemplate;

/// Hardhat account #0 (DO NOT USE IN PRODUCTION)
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// 1 ETH transfer, gas 21000 at 50 wei
pub fn sample_template(hash_byte: u8) -> TransactionTemplate {
    TransactionTemplate {
        hash: H256::repeat_byte(hash_byte),
        from: Address::repeat_byte(0x11),
        to: Address::repeat_byte(0x22),
        value: U256::exp10(18),
        gas: 21_000,
        gas_price: U256::from(50u64),
        data: Bytes::default(),
    }
}

#[derive(Default)]
pub struct MockChain {
    balance: Mutex<U256>,
    nonce: Mutex<U256>,
    templates: Mutex<HashMap<H256, TransactionTemplate>>,
    broadcast_error: Mutex<Option<String>>,
    sent: Mutex<Vec<Bytes>>,
    balance_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    nonce_calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, wei: U256) {
        *self.balance.lock() = wei;
    }

    pub fn set_nonce(&self, nonce: u64) {
        *self.nonce.lock() = U256::from(nonce);
    }

    pub fn insert_template(&self, template: TransactionTemplate) {
        self.templates.lock().insert(template.hash, template);
    }

    pub fn fail_broadcast(&self, message: &str) {
        *self.broadcast_error.lock() = Some(message.to_string());
    }

    pub fn sent_transactions(&self) -> Vec<Bytes> {
        self.sent.lock().clone()
    }

    pub fn nonce_calls(&self) -> usize {
        self.nonce_calls.load(Ordering::SeqCst)
    }

    /// Every RPC call made so far, broadcasts included
    pub fn total_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
            + self.lookup_calls.load(Ordering::SeqCst)
            + self.nonce_calls.load(Ordering::SeqCst)
            + self.sent.lock().len()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn balance(&self, _address: Address) -> Result<U256, QuickTaskError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.balance.lock())
    }

    async fn transaction_by_hash(&self, hash: H256) -> Result<TransactionTemplate, QuickTaskError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.templates
            .lock()
            .get(&hash)
            .cloned()
            .ok_or(QuickTaskError::TransactionNotFound(hash))
    }

    async fn pending_nonce(&self, _address: Address) -> Result<U256, QuickTaskError> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.nonce.lock())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256, QuickTaskError> {
        if let Some(message) = self.broadcast_error.lock().clone() {
            return Err(QuickTaskError::Network(message));
        }
        let hash = H256::from(keccak256(&raw));
        self.sent.lock().push(raw);
        Ok(hash)
    }
}

/// Simulator answering per transaction hash; unknown hashes are accepted
#[derive(Default)]
pub struct MockSimulator {
    outcomes: Mutex<HashMap<H256, Result<SimulationOutcome, QuickTaskError>>>,
    calls: AtomicUsize,
}

impl MockSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&self, hash: H256, outcome: Result<SimulationOutcome, QuickTaskError>) {
        self.outcomes.lock().insert(hash, outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Simulator for MockSimulator {
    async fn simulate(
        &self,
        candidate: &TransactionTemplate,
        _from: Address,
    ) -> Result<SimulationOutcome, QuickTaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .get(&candidate.hash)
            .cloned()
            .unwrap_or_else(|| Ok(SimulationOutcome::accepted()))
    }
}

/// Sender that records templates; optionally blocks until released
pub struct MockSender {
    sent: Mutex<Vec<TransactionTemplate>>,
    error: Mutex<Option<QuickTaskError>>,
    gate: Option<Semaphore>,
}

impl MockSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            error: Mutex::new(None),
            gate: None,
        }
    }

    /// Each send waits for one `release()`
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn fail_with(&self, error: QuickTaskError) {
        *self.error.lock() = Some(error);
    }

    pub fn sent(&self) -> Vec<TransactionTemplate> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl TxSender for MockSender {
    async fn sign_and_send(&self, template: &TransactionTemplate) -> Result<H256, QuickTaskError> {
        self.sent.lock().push(template.clone());
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| QuickTaskError::Network(e.to_string()))?
                .forget();
        }
        if let Some(error) = self.error.lock().clone() {
            return Err(error);
        }
        Ok(H256::from(keccak256(template.hash.as_bytes())))
    }
}
