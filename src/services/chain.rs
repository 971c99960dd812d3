//! EVM JSON-RPC access
//!
//! Everything that talks to a node lives here, behind two traits:
//! [`RewardsChain`] for the rewards distributor contract and [`TokenChain`]
//! for ERC-20 reads. Sync and supply logic only see the traits.

use std::str::FromStr;

use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{BlockTransactionsKind, Filter, Log},
    sol,
    sol_types::SolEvent,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::entities::sea_orm_active_enums::NftTier;

pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Largest scale `rust_decimal` can represent
const MAX_DECIMAL_SCALE: u32 = 28;

sol! {
    #[sol(rpc)]
    interface IDitRewardsDistributor {
        event RewardsDistributed(uint8 indexed nftType, uint256 totalAmount, uint256 perWallet, uint256 walletCount);
        event RewardsClaimed(address indexed user, uint256 amount);

        function pendingRewards(address user) external view returns (uint256);
        function claimedRewards(address user) external view returns (uint256);
        function totalRewardsByNFTType(uint8 nftType) external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to connect to blockchain node: {0}")]
    Connection(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("failed to decode log: {0}")]
    Decode(String),

    #[error("amount out of range: {0}")]
    AmountOverflow(String),
}

/// Decoded `RewardsDistributed` log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionEvent {
    pub tx_hash: String,
    pub log_index: u64,
    pub block_number: u64,
    pub tier_code: u8,
    pub total_amount: U256,
    pub per_wallet: U256,
    pub wallet_count: U256,
}

/// Decoded `RewardsClaimed` log; `user` is lowercase hex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEvent {
    pub tx_hash: String,
    pub log_index: u64,
    pub block_number: u64,
    pub user: String,
    pub amount: U256,
}

/// Per-log decode outcome. A bad log does not fail the whole query.
pub type LogResult<T> = Result<T, ChainError>;

#[async_trait]
pub trait RewardsChain: Send + Sync {
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Decimals of the reward token, `DEFAULT_TOKEN_DECIMALS` when unknown
    async fn token_decimals(&self) -> u8;

    async fn distribution_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogResult<DistributionEvent>>, ChainError>;

    async fn claim_logs(
        &self,
        from_block: u64,
        to_block: u64,
        wallet: Option<&str>,
    ) -> Result<Vec<LogResult<ClaimEvent>>, ChainError>;

    async fn block_timestamp(&self, block_number: u64) -> Result<DateTime<Utc>, ChainError>;
}

#[async_trait]
pub trait TokenChain: Send + Sync {
    async fn decimals(&self) -> Result<u8, ChainError>;

    async fn balance_of(&self, wallet: &str) -> Result<U256, ChainError>;
}

impl NftTier {
    /// Tier lookup for the `uint8 nftType` emitted by the contract
    pub fn from_chain_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(NftTier::Red),
            1 => Some(NftTier::Green),
            2 => Some(NftTier::Blue),
            3 => Some(NftTier::Black),
            4 => Some(NftTier::Dragon),
            5 => Some(NftTier::FlawlessDiamond),
            _ => None,
        }
    }

    pub fn chain_code(&self) -> u8 {
        match self {
            NftTier::Red => 0,
            NftTier::Green => 1,
            NftTier::Blue => 2,
            NftTier::Black => 3,
            NftTier::Dragon => 4,
            NftTier::FlawlessDiamond => 5,
        }
    }
}

/// Convert an integer base-unit amount to a decimal token amount.
///
/// Exact for every value that fits in a `Decimal`; scales above 28 drop the
/// excess low-order digits.
pub fn units_to_decimal(amount: U256, decimals: u8) -> Result<Decimal, ChainError> {
    let mut value = amount;
    let mut scale = decimals as u32;
    if scale > MAX_DECIMAL_SCALE {
        let divisor = U256::from(10u64).pow(U256::from(scale - MAX_DECIMAL_SCALE));
        value /= divisor;
        scale = MAX_DECIMAL_SCALE;
    }

    let overflow = || ChainError::AmountOverflow(amount.to_string());
    let raw = u128::try_from(value).map_err(|_| overflow())?;
    let raw = i128::try_from(raw).map_err(|_| overflow())?;

    Decimal::try_from_i128_with_scale(raw, scale)
        .map(|d| d.normalize())
        .map_err(|_| overflow())
}

pub fn parse_address(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim())
        .map_err(|e| ChainError::InvalidConfig(format!("Invalid address {}: {}", raw, e)))
}

fn connect_provider(rpc_url: &str) -> Result<RootProvider<Http<Client>>, ChainError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ChainError::InvalidConfig(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;
    Ok(ProviderBuilder::new().on_http(url))
}

fn log_position(log: &Log) -> Result<(String, u64, u64), ChainError> {
    let tx_hash = log
        .transaction_hash
        .ok_or_else(|| ChainError::Decode("log without transaction hash".to_string()))?;
    let log_index = log
        .log_index
        .ok_or_else(|| ChainError::Decode("log without log index".to_string()))?;
    let block_number = log
        .block_number
        .ok_or_else(|| ChainError::Decode("log without block number".to_string()))?;
    Ok((format!("{:?}", tx_hash), log_index, block_number))
}

/// Rewards distributor reader backed by an alloy HTTP provider
pub struct AlloyRewardsChain {
    provider: RootProvider<Http<Client>>,
    contract: Address,
    token: Option<Address>,
}

impl AlloyRewardsChain {
    /// Build the provider and verify the node answers.
    pub async fn connect(
        rpc_url: &str,
        contract_address: &str,
        token_address: Option<&str>,
    ) -> Result<Self, ChainError> {
        let provider = connect_provider(rpc_url)?;
        let contract = parse_address(contract_address)?;
        let token = token_address.map(parse_address).transpose()?;

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?;

        info!(
            rpc_url = %rpc_url,
            chain_id = chain_id,
            contract = %contract,
            "Connected to rewards chain"
        );

        Ok(Self {
            provider,
            contract,
            token,
        })
    }

    /// Rewards a wallet can still claim; zero when the call fails
    pub async fn pending_rewards(&self, wallet: &str) -> Decimal {
        let result: Result<Decimal, ChainError> = async {
            let user = parse_address(wallet)?;
            let contract = IDitRewardsDistributor::new(self.contract, &self.provider);
            let raw = contract
                .pendingRewards(user)
                .call()
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?
                ._0;
            units_to_decimal(raw, self.token_decimals().await)
        }
        .await;

        result.unwrap_or_else(|e| {
            error!(wallet = %wallet, error = %e, "Failed to fetch pending rewards");
            Decimal::ZERO
        })
    }

    /// Total a wallet has claimed so far; zero when the call fails
    pub async fn claimed_rewards(&self, wallet: &str) -> Decimal {
        let result: Result<Decimal, ChainError> = async {
            let user = parse_address(wallet)?;
            let contract = IDitRewardsDistributor::new(self.contract, &self.provider);
            let raw = contract
                .claimedRewards(user)
                .call()
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?
                ._0;
            units_to_decimal(raw, self.token_decimals().await)
        }
        .await;

        result.unwrap_or_else(|e| {
            error!(wallet = %wallet, error = %e, "Failed to fetch claimed rewards");
            Decimal::ZERO
        })
    }

    /// Lifetime rewards distributed for a tier; zero when the call fails
    pub async fn total_rewards_by_tier(&self, tier: NftTier) -> Decimal {
        let result: Result<Decimal, ChainError> = async {
            let contract = IDitRewardsDistributor::new(self.contract, &self.provider);
            let raw = contract
                .totalRewardsByNFTType(tier.chain_code())
                .call()
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))?
                ._0;
            units_to_decimal(raw, self.token_decimals().await)
        }
        .await;

        result.unwrap_or_else(|e| {
            error!(tier = %tier, error = %e, "Failed to fetch total rewards for tier");
            Decimal::ZERO
        })
    }
}

#[async_trait]
impl RewardsChain for AlloyRewardsChain {
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to get block number: {}", e)))
    }

    async fn token_decimals(&self) -> u8 {
        let Some(token) = self.token else {
            return DEFAULT_TOKEN_DECIMALS;
        };
        match IERC20::new(token, &self.provider).decimals().call().await {
            Ok(r) => r._0,
            Err(e) => {
                warn!(error = %e, "Failed to get reward token decimals, using default 18");
                DEFAULT_TOKEN_DECIMALS
            }
        }
    }

    async fn distribution_logs(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogResult<DistributionEvent>>, ChainError> {
        let filter = Filter::new()
            .address(self.contract)
            .event_signature(IDitRewardsDistributor::RewardsDistributed::SIGNATURE_HASH)
            .from_block(BlockNumberOrTag::Number(from_block))
            .to_block(BlockNumberOrTag::Number(to_block));

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to get logs: {}", e)))?;

        debug!(
            from_block = from_block,
            to_block = to_block,
            log_count = logs.len(),
            "Fetched RewardsDistributed logs"
        );

        Ok(logs
            .iter()
            .map(|log| {
                let (tx_hash, log_index, block_number) = log_position(log)?;
                let decoded = log
                    .log_decode::<IDitRewardsDistributor::RewardsDistributed>()
                    .map_err(|e| ChainError::Decode(e.to_string()))?;
                let event = decoded.inner.data;
                Ok(DistributionEvent {
                    tx_hash,
                    log_index,
                    block_number,
                    tier_code: event.nftType,
                    total_amount: event.totalAmount,
                    per_wallet: event.perWallet,
                    wallet_count: event.walletCount,
                })
            })
            .collect())
    }

    async fn claim_logs(
        &self,
        from_block: u64,
        to_block: u64,
        wallet: Option<&str>,
    ) -> Result<Vec<LogResult<ClaimEvent>>, ChainError> {
        let mut filter = Filter::new()
            .address(self.contract)
            .event_signature(IDitRewardsDistributor::RewardsClaimed::SIGNATURE_HASH)
            .from_block(BlockNumberOrTag::Number(from_block))
            .to_block(BlockNumberOrTag::Number(to_block));

        if let Some(wallet) = wallet {
            let user = parse_address(wallet)?;
            filter = filter.topic1(user.into_word());
        }

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to get logs: {}", e)))?;

        debug!(
            from_block = from_block,
            to_block = to_block,
            log_count = logs.len(),
            "Fetched RewardsClaimed logs"
        );

        Ok(logs
            .iter()
            .map(|log| {
                let (tx_hash, log_index, block_number) = log_position(log)?;
                let decoded = log
                    .log_decode::<IDitRewardsDistributor::RewardsClaimed>()
                    .map_err(|e| ChainError::Decode(e.to_string()))?;
                let event = decoded.inner.data;
                Ok(ClaimEvent {
                    tx_hash,
                    log_index,
                    block_number,
                    user: format!("{:?}", event.user).to_lowercase(),
                    amount: event.amount,
                })
            })
            .collect())
    }

    async fn block_timestamp(&self, block_number: u64) -> Result<DateTime<Utc>, ChainError> {
        let block = self
            .provider
            .get_block(BlockId::number(block_number), BlockTransactionsKind::Hashes)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or_else(|| ChainError::Rpc(format!("block {} not found", block_number)))?;

        let timestamp = block.header.timestamp;
        DateTime::from_timestamp(timestamp as i64, 0)
            .ok_or_else(|| ChainError::Decode(format!("invalid block timestamp {}", timestamp)))
    }
}

/// ERC-20 reader backed by an alloy HTTP provider
pub struct AlloyTokenChain {
    provider: RootProvider<Http<Client>>,
    token: Address,
}

impl AlloyTokenChain {
    pub async fn connect(rpc_url: &str, token_address: &str) -> Result<Self, ChainError> {
        let provider = connect_provider(rpc_url)?;
        let token = parse_address(token_address)?;

        provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?;

        Ok(Self { provider, token })
    }
}

#[async_trait]
impl TokenChain for AlloyTokenChain {
    async fn decimals(&self) -> Result<u8, ChainError> {
        IERC20::new(self.token, &self.provider)
            .decimals()
            .call()
            .await
            .map(|r| r._0)
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn balance_of(&self, wallet: &str) -> Result<U256, ChainError> {
        let account = parse_address(wallet)?;
        IERC20::new(self.token, &self.provider)
            .balanceOf(account)
            .call()
            .await
            .map(|r| r._0)
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wei(value: &str) -> U256 {
        U256::from_str(value).unwrap()
    }

    #[test]
    fn test_tier_codes() {
        assert_eq!(NftTier::from_chain_code(0), Some(NftTier::Red));
        assert_eq!(NftTier::from_chain_code(3), Some(NftTier::Black));
        assert_eq!(NftTier::from_chain_code(5), Some(NftTier::FlawlessDiamond));
        assert_eq!(NftTier::from_chain_code(6), None);
        assert_eq!(NftTier::from_chain_code(255), None);
    }

    #[test]
    fn test_tier_code_round_trip() {
        for tier in NftTier::ALL {
            assert_eq!(NftTier::from_chain_code(tier.chain_code()), Some(tier));
        }
    }

    #[test]
    fn test_units_to_decimal_whole_tokens() {
        let amount = wei("10000000000000000000000");
        assert_eq!(units_to_decimal(amount, 18).unwrap(), dec!(10000));
    }

    #[test]
    fn test_units_to_decimal_fractional() {
        assert_eq!(units_to_decimal(wei("1500000000000000000"), 18).unwrap(), dec!(1.5));
        assert_eq!(units_to_decimal(wei("1"), 18).unwrap(), dec!(0.000000000000000001));
        assert_eq!(units_to_decimal(wei("2500000"), 6).unwrap(), dec!(2.5));
        assert_eq!(units_to_decimal(U256::ZERO, 18).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_units_to_decimal_large_scale() {
        // 30 decimals: the two lowest digits are dropped
        let amount = wei("1230000000000000000000000000000");
        assert_eq!(units_to_decimal(amount, 30).unwrap(), dec!(1.23));
    }

    #[test]
    fn test_units_to_decimal_overflow() {
        assert!(matches!(
            units_to_decimal(U256::MAX, 18),
            Err(ChainError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("0xc62831c476F6c36D42299b3C6BAa519198302D4b").is_ok());
        assert!(parse_address("not-an-address").is_err());
    }

    #[tokio::test]
    async fn test_connect_unreachable_node() {
        let result = AlloyRewardsChain::connect(
            "http://127.0.0.1:1",
            "0xc62831c476F6c36D42299b3C6BAa519198302D4b",
            None,
        )
        .await;
        match result {
            Err(ChainError::Connection(_)) => {}
            Err(other) => panic!("expected a connection error, got {other}"),
            Ok(_) => panic!("connected to an unreachable node"),
        }
    }
}
