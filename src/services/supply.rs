//! Circulating supply for CoinMarketCap
//!
//! Circulating supply is the fixed total minus the balances held by the
//! excluded team and treasury wallets, floored at zero. Balances are read from
//! the chain on every call.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::services::chain::{
    units_to_decimal, AlloyTokenChain, ChainError, TokenChain, DEFAULT_TOKEN_DECIMALS,
};

pub const TOTAL_SUPPLY: u64 = 100_000_000;

#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("Failed to connect to blockchain network")]
    Connection(#[source] ChainError),

    #[error("{0}")]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyBreakdown {
    pub total_supply: Decimal,
    pub circulating_supply: Decimal,
    pub excluded_wallets_balance: Decimal,
}

/// Sum excluded balances and derive circulating supply.
///
/// Wallets are read one after another; a failed read contributes zero.
pub async fn compute_circulating_supply<T: TokenChain + ?Sized>(
    token: &T,
    excluded_wallets: &[String],
) -> SupplyBreakdown {
    let decimals = match token.decimals().await {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "Failed to get decimals, using default 18");
            DEFAULT_TOKEN_DECIMALS
        }
    };

    let mut excluded = Decimal::ZERO;
    for wallet in excluded_wallets {
        let balance = token
            .balance_of(wallet)
            .await
            .and_then(|raw| units_to_decimal(raw, decimals));
        match balance {
            Ok(balance) => {
                info!(wallet = %wallet, balance = %balance, "Excluded wallet balance");
                excluded += balance;
            }
            Err(e) => {
                error!(wallet = %wallet, error = %e, "Error fetching balance");
            }
        }
    }

    let total = Decimal::from(TOTAL_SUPPLY);
    let circulating = (total - excluded).max(Decimal::ZERO);

    SupplyBreakdown {
        total_supply: total,
        circulating_supply: circulating,
        excluded_wallets_balance: excluded,
    }
}

/// Connects to the supply chain per request
#[derive(Debug, Clone)]
pub struct SupplyService {
    rpc_url: String,
    token_address: String,
    excluded_wallets: Vec<String>,
}

impl SupplyService {
    pub fn new(rpc_url: String, token_address: String, excluded_wallets: Vec<String>) -> Self {
        Self {
            rpc_url,
            token_address,
            excluded_wallets,
        }
    }

    pub async fn fetch(&self) -> Result<SupplyBreakdown, SupplyError> {
        let token = AlloyTokenChain::connect(&self.rpc_url, &self.token_address)
            .await
            .map_err(|e| match e {
                ChainError::Connection(_) => SupplyError::Connection(e),
                other => SupplyError::Chain(other),
            })?;

        Ok(compute_circulating_supply(&token, &self.excluded_wallets).await)
    }
}
