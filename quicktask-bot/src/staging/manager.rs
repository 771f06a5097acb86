//! Single-slot stager
//!
//! Thread-safe owner of the pending transaction slot.

use chrono::Utc;
use ethers::types::{Address, H256};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::types::StagedTransaction;
use crate::broadcast::TxSender;
use crate::chain::ChainClient;
use crate::error::QuickTaskError;
use crate::simulation::Simulator;

/// How long a staged transaction waits for confirmation (10 minutes)
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(600);

/// Gas price older than this is flagged when confirming
const STALE_GAS_PRICE_SECS: i64 = 60;

#[derive(Default)]
struct Slot {
    staged: Option<StagedTransaction>,
    /// Cancels the expiry task of `staged`
    expiry: Option<CancellationToken>,
    /// Generation currently being broadcast
    confirming: Option<u64>,
}

impl Slot {
    fn generation(&self) -> Option<u64> {
        self.staged.as_ref().map(|s| s.generation)
    }

    /// The staged entry has already been handed to the sender
    fn is_confirming(&self) -> bool {
        self.confirming.is_some() && self.confirming == self.generation()
    }

    fn clear(&mut self) -> Option<StagedTransaction> {
        if let Some(token) = self.expiry.take() {
            token.cancel();
        }
        self.confirming = None;
        self.staged.take()
    }
}

/// Clear the slot if it still holds `generation`
fn clear_generation(slot: &Mutex<Slot>, generation: u64) -> Option<StagedTransaction> {
    let mut slot = slot.lock();
    if slot.generation() == Some(generation) {
        slot.clear()
    } else {
        None
    }
}

/// Expire `generation` unless it is gone or already broadcasting
fn expire_generation(slot: &Mutex<Slot>, generation: u64) -> Option<StagedTransaction> {
    let mut slot = slot.lock();
    if slot.generation() != Some(generation) {
        return None;
    }
    if slot.is_confirming() {
        log::debug!(
            "[Stager] Generation {} reached its deadline while broadcasting",
            generation
        );
        return None;
    }
    slot.clear()
}

/// Owner of the single pending-transaction slot
pub struct TxStager {
    chain: Arc<dyn ChainClient>,
    simulator: Arc<dyn Simulator>,
    sender: Arc<dyn TxSender>,
    operator: Address,
    timeout: Duration,
    slot: Arc<Mutex<Slot>>,
    generations: AtomicU64,
}

impl TxStager {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        simulator: Arc<dyn Simulator>,
        sender: Arc<dyn TxSender>,
        operator: Address,
    ) -> Self {
        Self {
            chain,
            simulator,
            sender,
            operator,
            timeout: DEFAULT_STAGE_TIMEOUT,
            slot: Arc::new(Mutex::new(Slot::default())),
            generations: AtomicU64::new(0),
        }
    }

    /// Override the staging timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch, simulate and stage a transaction.
    ///
    /// The slot is only written after a successful simulation, so a failed or
    /// reverting candidate never displaces an entry that is already staged.
    pub async fn stage(&self, hash: H256) -> Result<StagedTransaction, QuickTaskError> {
        log::info!("[Stager] Staging transaction {:?}", hash);

        let template = self.chain.transaction_by_hash(hash).await?;
        let outcome = self.simulator.simulate(&template, self.operator).await?;

        if !outcome.accepted {
            log::warn!(
                "[Stager] Simulation of {:?} predicts a revert: {}",
                hash,
                outcome.error_message.as_deref().unwrap_or("no reason given")
            );
            return Err(QuickTaskError::SimulationRejected(outcome.error_message));
        }

        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let staged_at = Utc::now();
        let expires_at = staged_at
            + chrono::Duration::from_std(self.timeout).unwrap_or_else(|_| chrono::Duration::zero());
        let staged = StagedTransaction {
            template,
            simulation: outcome,
            staged_at,
            expires_at,
            generation,
        };

        let token = CancellationToken::new();
        {
            let mut slot = self.slot.lock();
            if let Some(previous) = slot.clear() {
                log::info!(
                    "[Stager] Replacing pending transaction {:?} with {:?}",
                    previous.template.hash,
                    hash
                );
            }
            slot.staged = Some(staged.clone());
            slot.expiry = Some(token.clone());
        }
        self.spawn_expiry(generation, token);

        log::info!(
            "[Stager] Transaction {:?} pending (generation {}), expires at {}",
            hash,
            generation,
            expires_at
        );
        Ok(staged)
    }

    fn spawn_expiry(&self, generation: u64, token: CancellationToken) {
        let slot = Arc::clone(&self.slot);
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    if let Some(expired) = expire_generation(&slot, generation) {
                        log::warn!(
                            "[Stager] Transaction {:?} expired after {}s",
                            expired.template.hash,
                            timeout.as_secs()
                        );
                    }
                }
            }
        });
    }

    /// Clear the slot. Returns the entry that was removed, if any.
    ///
    /// An entry whose broadcast has started can no longer be cancelled; rejecting it
    /// fails with `ConfirmationInProgress` and leaves the slot as it is.
    pub fn reject(&self) -> Result<Option<StagedTransaction>, QuickTaskError> {
        let removed = {
            let mut slot = self.slot.lock();
            if slot.is_confirming() {
                log::warn!("[Stager] Clear requested while the pending transaction is broadcasting");
                return Err(QuickTaskError::ConfirmationInProgress);
            }
            slot.clear()
        };
        match &removed {
            Some(staged) => log::info!("[Stager] Cleared pending transaction {:?}", staged.template.hash),
            None => log::debug!("[Stager] Clear requested with nothing pending"),
        }
        Ok(removed)
    }

    /// Broadcast the staged transaction.
    ///
    /// The entry is cleared once the broadcast call returns, whether it succeeded or
    /// not, and only if no newer stage replaced it in the meantime.
    pub async fn confirm(&self) -> Result<H256, QuickTaskError> {
        let staged = {
            let mut slot = self.slot.lock();
            let staged = slot.staged.clone().ok_or(QuickTaskError::NoPendingTransaction)?;
            if slot.confirming == Some(staged.generation) {
                return Err(QuickTaskError::ConfirmationInProgress);
            }
            slot.confirming = Some(staged.generation);
            staged
        };

        let age = Utc::now() - staged.staged_at;
        if age.num_seconds() > STALE_GAS_PRICE_SECS {
            log::warn!(
                "[Stager] Gas price of {:?} was quoted {}s ago and may be stale",
                staged.template.hash,
                age.num_seconds()
            );
        }

        log::info!(
            "[Stager] Confirming {:?} (generation {})",
            staged.template.hash,
            staged.generation
        );
        let result = self.sender.sign_and_send(&staged.template).await;

        if clear_generation(&self.slot, staged.generation).is_none() {
            log::debug!(
                "[Stager] Generation {} left the slot during broadcast",
                staged.generation
            );
        }

        match &result {
            Ok(tx_hash) => log::info!(
                "[Stager] Transaction {:?} broadcast as {:?}",
                staged.template.hash,
                tx_hash
            ),
            Err(e) => log::error!(
                "[Stager] Broadcast of {:?} failed: {}",
                staged.template.hash,
                e
            ),
        }
        result
    }

    /// Snapshot of the staged entry
    pub fn pending(&self) -> Option<StagedTransaction> {
        self.slot.lock().staged.clone()
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().staged.is_some()
    }
}
