//! Local signing key for the operator account

use ethers::core::k256::ecdsa::SigningKey;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Signature};

use crate::error::QuickTaskError;

/// Wallet holding the operator's private key, bound to one chain id
#[derive(Clone)]
pub struct OperatorWallet {
    wallet: LocalWallet,
}

impl OperatorWallet {
    /// Create a wallet from a private key string (with or without 0x prefix)
    pub fn from_private_key(private_key: &str, chain_id: u64) -> Result<Self, QuickTaskError> {
        let key_hex = private_key.trim().strip_prefix("0x").unwrap_or(private_key.trim());

        let key_bytes = hex::decode(key_hex)
            .map_err(|e| QuickTaskError::Config(format!("Invalid private key hex: {}", e)))?;
        if key_bytes.len() != 32 {
            return Err(QuickTaskError::Config(format!(
                "Invalid private key length: expected 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let signing_key = SigningKey::from_bytes(key_bytes.as_slice().into())
            .map_err(|e| QuickTaskError::Config(format!("Invalid private key: {}", e)))?;

        let wallet = LocalWallet::from(signing_key).with_chain_id(chain_id);

        Ok(Self { wallet })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }

    /// Sign a transaction; legacy transactions get EIP-155 replay protection
    pub fn sign_transaction(&self, tx: &TypedTransaction) -> Result<Signature, QuickTaskError> {
        self.wallet
            .sign_transaction_sync(tx)
            .map_err(|e| QuickTaskError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for OperatorWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorWallet")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hardhat account #0 (DO NOT USE IN PRODUCTION)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_from_private_key() {
        let wallet = OperatorWallet::from_private_key(TEST_KEY, 1).unwrap();
        assert_eq!(
            format!("{:?}", wallet.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(wallet.chain_id(), 1);
    }

    #[test]
    fn test_from_private_key_no_prefix() {
        let wallet = OperatorWallet::from_private_key(&TEST_KEY[2..], 5).unwrap();
        assert_eq!(
            format!("{:?}", wallet.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_key() {
        assert!(OperatorWallet::from_private_key("0xnothex", 1).is_err());
        assert!(OperatorWallet::from_private_key("0x1234", 1).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = OperatorWallet::from_private_key(TEST_KEY, 1).unwrap();
        let rendered = format!("{:?}", wallet);
        assert!(!rendered.contains("ac0974bec39a17e3"));
    }
}
