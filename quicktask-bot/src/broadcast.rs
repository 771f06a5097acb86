//! Re-sign and broadcast a staged transaction
//!
//! The staged transaction is a template: its recipient, value, gas limit, gas price
//! and calldata are copied into a fresh legacy transaction sent from the operator
//! account with the operator's current pending nonce.

use async_trait::async_trait;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest, H256, U256};
use std::sync::Arc;

use crate::chain::ChainClient;
use crate::error::QuickTaskError;
use crate::staging::TransactionTemplate;
use crate::wallet::OperatorWallet;

/// Hands a confirmed template to the network
#[async_trait]
pub trait TxSender: Send + Sync {
    async fn sign_and_send(&self, template: &TransactionTemplate) -> Result<H256, QuickTaskError>;
}

/// Build the transaction the operator signs for `template`
pub fn rebuild_transaction(
    template: &TransactionTemplate,
    from: Address,
    nonce: U256,
    chain_id: u64,
) -> TypedTransaction {
    TransactionRequest::new()
        .from(from)
        .to(template.to)
        .value(template.value)
        .gas(template.gas)
        .gas_price(template.gas_price)
        .data(template.data.clone())
        .nonce(nonce)
        .chain_id(chain_id)
        .into()
}

pub struct ChainBroadcaster {
    chain: Arc<dyn ChainClient>,
    wallet: OperatorWallet,
}

impl ChainBroadcaster {
    pub fn new(chain: Arc<dyn ChainClient>, wallet: OperatorWallet) -> Self {
        Self { chain, wallet }
    }
}

#[async_trait]
impl TxSender for ChainBroadcaster {
    async fn sign_and_send(&self, template: &TransactionTemplate) -> Result<H256, QuickTaskError> {
        let from = self.wallet.address();

        // Never cached: the template may have been staged minutes ago
        let nonce = self.chain.pending_nonce(from).await?;

        let tx = rebuild_transaction(template, from, nonce, self.wallet.chain_id());
        let signature = self.wallet.sign_transaction(&tx)?;
        let raw = tx.rlp_signed(&signature);
        let local_hash = tx.hash(&signature);

        log::info!(
            "[Broadcast] Sending {:?} (template {:?}) nonce={} chain_id={}",
            local_hash,
            template.hash,
            nonce,
            self.wallet.chain_id()
        );

        let tx_hash = self.chain.send_raw_transaction(raw).await?;
        if tx_hash != local_hash {
            log::warn!(
                "[Broadcast] Node reported hash {:?}, expected {:?}",
                tx_hash,
                local_hash
            );
        }

        log::info!("[Broadcast] Transaction sent: {:?}", tx_hash);
        Ok(tx_hash)
    }
}
