//! Operator wallet
//!
//! The operator's key is loaded once from configuration and used to re-sign staged
//! transactions under EIP-155 for the configured chain.

mod operator;

pub use operator::OperatorWallet;
