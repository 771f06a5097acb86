//! JSON-RPC client over ethers' HTTP provider

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, BlockId, BlockNumber, Bytes, H256, U256};
use url::Url;

use super::ChainClient;
use crate::error::QuickTaskError;
use crate::staging::TransactionTemplate;

pub struct EthersRpc {
    provider: Provider<Http>,
}

impl EthersRpc {
    /// Connect to an HTTP JSON-RPC endpoint using the given reqwest client
    pub fn new(rpc_url: &str, client: reqwest::Client) -> Result<Self, QuickTaskError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| QuickTaskError::Config(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;
        let provider = Provider::new(Http::new_with_client(url, client));
        Ok(Self { provider })
    }
}

fn rpc_error(call: &str, e: impl std::fmt::Display) -> QuickTaskError {
    QuickTaskError::Network(format!("{} failed: {}", call, e))
}

#[async_trait]
impl ChainClient for EthersRpc {
    async fn balance(&self, address: Address) -> Result<U256, QuickTaskError> {
        log::debug!("[Rpc] eth_getBalance {:?}", address);
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| rpc_error("eth_getBalance", e))
    }

    async fn transaction_by_hash(&self, hash: H256) -> Result<TransactionTemplate, QuickTaskError> {
        log::debug!("[Rpc] eth_getTransactionByHash {:?}", hash);
        let tx = self
            .provider
            .get_transaction(hash)
            .await
            .map_err(|e| rpc_error("eth_getTransactionByHash", e))?
            .ok_or(QuickTaskError::TransactionNotFound(hash))?;

        TransactionTemplate::try_from(tx)
    }

    async fn pending_nonce(&self, address: Address) -> Result<U256, QuickTaskError> {
        log::debug!("[Rpc] eth_getTransactionCount {:?} (pending)", address);
        self.provider
            .get_transaction_count(address, Some(BlockId::Number(BlockNumber::Pending)))
            .await
            .map_err(|e| rpc_error("eth_getTransactionCount", e))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256, QuickTaskError> {
        log::debug!("[Rpc] eth_sendRawTransaction ({} bytes)", raw.len());
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| rpc_error("eth_sendRawTransaction", e))?;
        Ok(pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let err = EthersRpc::new("not a url", reqwest::Client::new()).err().unwrap();
        assert!(matches!(err, QuickTaskError::Config(_)));
    }

    #[test]
    fn test_accepts_http_url() {
        assert!(EthersRpc::new("http://localhost:8545", reqwest::Client::new()).is_ok());
    }
}
