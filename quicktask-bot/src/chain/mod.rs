//! Blockchain RPC access
//!
//! The bot only needs four calls from a node: balance, transaction lookup by hash,
//! pending nonce and raw broadcast. They sit behind `ChainClient` so the staging core
//! can be driven by a mock in tests.

mod rpc;

pub use rpc::EthersRpc;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};

use crate::error::QuickTaskError;
use crate::staging::TransactionTemplate;

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest balance in wei
    async fn balance(&self, address: Address) -> Result<U256, QuickTaskError>;

    /// Fetch a transaction by hash as a staging template
    async fn transaction_by_hash(&self, hash: H256) -> Result<TransactionTemplate, QuickTaskError>;

    /// Nonce including pending transactions; always read fresh
    async fn pending_nonce(&self, address: Address) -> Result<U256, QuickTaskError>;

    /// Submit RLP-encoded signed bytes, returning the transaction hash
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256, QuickTaskError>;
}
