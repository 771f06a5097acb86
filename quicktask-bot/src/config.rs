use std::env;
use std::time::Duration;

use ethers::types::Address;

use crate::error::QuickTaskError;
use crate::staging::DEFAULT_STAGE_TIMEOUT;
use crate::wallet::OperatorWallet;

/// Environment variable names
pub mod env_vars {
    pub const RPC_URL: &str = "RPC_URL";
    pub const ADDRESS: &str = "ADDRESS";
    pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
    pub const CHAIN_ID: &str = "CHAIN_ID";
    pub const TENDERLY_USER_NAME: &str = "TENDERLY_USER_NAME";
    pub const TENDERLY_PROJECT_SLUG: &str = "TENDERLY_PROJECT_SLUG";
    pub const TENDERLY_ACCESS_TOKEN: &str = "TENDERLY_ACCESS_TOKEN";
    pub const TENDERLY_API_URL: &str = "TENDERLY_API_URL";
    pub const DISCORD_ID: &str = "DISCORD_ID";
    pub const BOT_TOKEN: &str = "BOT_TOKEN";
    pub const EXPLORER_TX_URL: &str = "EXPLORER_TX_URL";
    pub const STAGE_TIMEOUT_SECS: &str = "STAGE_TIMEOUT_SECS";
}

pub const DEFAULT_CHAIN_ID: u64 = 1;
pub const DEFAULT_TENDERLY_API_URL: &str = "https://api.tenderly.co/api/v1";
pub const DEFAULT_EXPLORER_TX_URL: &str = "https://etherscan.io/tx";

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub operator_address: Address,
    pub private_key: String,
    pub chain_id: u64,
    pub tenderly_account: String,
    pub tenderly_project: String,
    pub tenderly_access_token: String,
    pub tenderly_api_url: String,
    pub authorized_user_id: String,
    pub bot_token: String,
    pub explorer_tx_url: String,
    pub stage_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets stay out of logs
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("operator_address", &self.operator_address)
            .field("chain_id", &self.chain_id)
            .field("tenderly_account", &self.tenderly_account)
            .field("tenderly_project", &self.tenderly_project)
            .field("tenderly_api_url", &self.tenderly_api_url)
            .field("authorized_user_id", &self.authorized_user_id)
            .field("explorer_tx_url", &self.explorer_tx_url)
            .field("stage_timeout", &self.stage_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, QuickTaskError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuickTaskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| QuickTaskError::Config(format!("{} must be set", key)))
        };

        let chain_id = match get(env_vars::CHAIN_ID) {
            Some(raw) => raw.parse().map_err(|_| {
                QuickTaskError::Config(format!("{} must be a valid number", env_vars::CHAIN_ID))
            })?,
            None => DEFAULT_CHAIN_ID,
        };

        let stage_timeout_secs = match get(env_vars::STAGE_TIMEOUT_SECS) {
            Some(raw) => raw.parse().map_err(|_| {
                QuickTaskError::Config(format!(
                    "{} must be a valid number",
                    env_vars::STAGE_TIMEOUT_SECS
                ))
            })?,
            None => DEFAULT_STAGE_TIMEOUT.as_secs(),
        };

        if stage_timeout_secs == 0 {
            return Err(QuickTaskError::Config(format!(
                "{} must be greater than zero",
                env_vars::STAGE_TIMEOUT_SECS
            )));
        }

        let private_key = require(env_vars::PRIVATE_KEY)?;
        let wallet = OperatorWallet::from_private_key(&private_key, chain_id)?;

        // ADDRESS is optional; when present it has to match the signing key
        let operator_address = match get(env_vars::ADDRESS) {
            Some(raw) => {
                let address: Address = raw.parse().map_err(|_| {
                    QuickTaskError::Config(format!("{} is not a valid address: {}", env_vars::ADDRESS, raw))
                })?;
                if address != wallet.address() {
                    return Err(QuickTaskError::Config(format!(
                        "{} {:?} does not match the address of {} ({:?})",
                        env_vars::ADDRESS,
                        address,
                        env_vars::PRIVATE_KEY,
                        wallet.address()
                    )));
                }
                address
            }
            None => wallet.address(),
        };

        let rpc_url = require(env_vars::RPC_URL)?;
        url::Url::parse(&rpc_url).map_err(|e| {
            QuickTaskError::Config(format!("{} is not a valid URL: {}", env_vars::RPC_URL, e))
        })?;

        Ok(Self {
            rpc_url,
            operator_address,
            private_key,
            chain_id,
            tenderly_account: require(env_vars::TENDERLY_USER_NAME)?,
            tenderly_project: require(env_vars::TENDERLY_PROJECT_SLUG)?,
            tenderly_access_token: require(env_vars::TENDERLY_ACCESS_TOKEN)?,
            tenderly_api_url: get(env_vars::TENDERLY_API_URL)
                .unwrap_or_else(|| DEFAULT_TENDERLY_API_URL.to_string()),
            authorized_user_id: require(env_vars::DISCORD_ID)?,
            bot_token: require(env_vars::BOT_TOKEN)?,
            explorer_tx_url: get(env_vars::EXPLORER_TX_URL)
                .unwrap_or_else(|| DEFAULT_EXPLORER_TX_URL.to_string()),
            stage_timeout: Duration::from_secs(stage_timeout_secs),
        })
    }
}
