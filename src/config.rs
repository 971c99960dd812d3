//! Environment configuration
//!
//! Every setting comes from the process environment (optionally seeded from a
//! `.env` file by `dotenvy`). Only `DATABASE_URL` is mandatory.

use std::env;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BLOCKCHAIN_RPC_URL: &str = "https://ethereum-sepolia.wallet.brave.com/";
pub const DEFAULT_REWARDS_CONTRACT: &str = "0xc62831c476F6c36D42299b3C6BAa519198302D4b";
pub const DEFAULT_SUPPLY_RPC_URL: &str = "https://bsc-dataseed1.binance.org";
pub const DEFAULT_DIT_TOKEN: &str = "0xbfa362937BFD11eC22a023aBF83B6dF4E5E303d4";
pub const DEFAULT_COMMUNITY_API_BASE_URL: &str = "https://api-community-diamond-club.io/api";
pub const DEFAULT_COMMUNITY_API_ACCESS_TOKEN: &str = "8b2be529-0afc-43a2-b8c7-27dfebcfeb81";
pub const DEFAULT_SYNC_CHUNK_SIZE: u64 = 10_000;

/// Team and treasury wallets excluded from circulating supply
pub const DEFAULT_EXCLUDED_WALLETS: [&str; 6] = [
    "0x10B5F02956d242aB770605D59B7D27E51E45774C",
    "0x1d64FD1e4eB9Df7C75Ad4B4DAe6A23aa8C4B5fe8",
    "0x9d921234C93914aF8712682E0C21241c1e179cBD",
    "0xA1179097b0424e9A7A59DB713692278606b904c1",
    "0x820Aa5a602bF939e633AEe38D63A13E2830D85a9",
    "0x0CD0468e488AA9F316D5bd082Ce558005e7bfF15",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub blockchain_rpc_url: String,
    pub rewards_contract_address: String,
    /// ERC-20 used to scale reward amounts; 18 decimals when unset
    pub rewards_token_address: Option<String>,
    pub supply_rpc_url: String,
    pub dit_token_address: String,
    pub excluded_wallets: Vec<String>,
    pub community_api_base_url: String,
    pub community_api_access_token: String,
    pub sync_chunk_size: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let sync_chunk_size = match get("SYNC_CHUNK_SIZE") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SYNC_CHUNK_SIZE",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_SYNC_CHUNK_SIZE,
        };

        let excluded_wallets = match get("EXCLUDED_WALLETS") {
            Some(raw) => parse_wallet_list(&raw),
            None => DEFAULT_EXCLUDED_WALLETS.iter().map(|w| w.to_string()).collect(),
        };

        Ok(Self {
            database_url,
            bind_addr: or("BIND_ADDR", DEFAULT_BIND_ADDR),
            blockchain_rpc_url: or("BLOCKCHAIN_RPC_URL", DEFAULT_BLOCKCHAIN_RPC_URL),
            rewards_contract_address: or("DIT_REWARDS_CONTRACT_ADDRESS", DEFAULT_REWARDS_CONTRACT),
            rewards_token_address: get("DIT_REWARDS_TOKEN_ADDRESS"),
            supply_rpc_url: or("SUPPLY_RPC_URL", DEFAULT_SUPPLY_RPC_URL),
            dit_token_address: or("DIT_TOKEN_ADDRESS", DEFAULT_DIT_TOKEN),
            excluded_wallets,
            community_api_base_url: or("COMMUNITY_API_BASE_URL", DEFAULT_COMMUNITY_API_BASE_URL),
            community_api_access_token: or(
                "COMMUNITY_API_ACCESS_TOKEN",
                DEFAULT_COMMUNITY_API_ACCESS_TOKEN,
            ),
            sync_chunk_size,
        })
    }
}

fn parse_wallet_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.sync_chunk_size, 10_000);
        assert_eq!(config.excluded_wallets.len(), 6);
        assert!(config.rewards_token_address.is_none());
    }

    #[test]
    fn test_database_url_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_chunk_size() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("SYNC_CHUNK_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SYNC_CHUNK_SIZE", .. }));
    }

    #[test]
    fn test_excluded_wallets_override() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("EXCLUDED_WALLETS", " 0xabc , ,0xdef"),
        ]))
        .unwrap();
        assert_eq!(config.excluded_wallets, vec!["0xabc", "0xdef"]);
    }
}
