//! Error types shared by the staging core and its collaborators

use ethers::types::H256;
use thiserror::Error;

/// Result alias used across the bot
pub type Result<T> = std::result::Result<T, QuickTaskError>;

/// Every failure a command can surface to the operator
#[derive(Debug, Clone, Error)]
pub enum QuickTaskError {
    /// RPC or HTTP transport failure, including undecodable responses
    #[error("network error: {0}")]
    Network(String),

    /// The simulation API answered with a non-2xx status
    #[error("simulation API returned HTTP {status}: {body}")]
    SimulationApi { status: u16, body: String },

    /// The simulation ran and predicts a revert
    #[error(
        "execution reverted{}",
        .0.as_deref().map(|reason| format!(": {}", reason)).unwrap_or_default()
    )]
    SimulationRejected(Option<String>),

    #[error("no pending transaction")]
    NoPendingTransaction,

    /// A confirmation for the same staged entry is already broadcasting
    #[error("confirmation already in progress")]
    ConfirmationInProgress,

    /// Bad command input, detected before any network call
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("transaction {0:?} not found")]
    TransactionNotFound(H256),

    /// The fetched transaction cannot serve as a template
    #[error("unsupported transaction: {0}")]
    UnsupportedTransaction(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl QuickTaskError {
    /// Render the error the way it is posted back to chat
    pub fn to_chat_message(&self) -> String {
        format!("Error: {}", self)
    }
}
