//! Blockchain event sync
//!
//! Pulls `RewardsDistributed` and `RewardsClaimed` logs over a block range in
//! fixed-size chunks and stores the ones not seen before. `(transaction hash,
//! log index)` identifies an event, so overlapping re-runs insert nothing new.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::entities::{
    prelude::*, reward_distributions, sea_orm_active_enums::NftTier, user_reward_claims,
};
use crate::services::chain::{units_to_decimal, ChainError, ClaimEvent, DistributionEvent, RewardsChain};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("value out of range: {0}")]
    OutOfRange(String),
}

/// Upper bound of a sync run, resolved when the run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTarget {
    #[default]
    Latest,
    Number(u64),
}

impl FromStr for BlockTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(BlockTarget::Latest);
        }
        s.parse::<u64>()
            .map(BlockTarget::Number)
            .map_err(|_| format!("expected a block number or 'latest', got '{}'", s))
    }
}

impl fmt::Display for BlockTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTarget::Latest => f.write_str("latest"),
            BlockTarget::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Outcome counters of one sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Rows written by this run
    pub inserted: u64,
    /// Known events and events with an unknown tier
    pub skipped: u64,
    /// Events that could not be decoded, converted or stored
    pub failed: u64,
}

/// Split `[from, to]` into inclusive chunks of at most `size` blocks
pub fn chunk_block_range(from: u64, to: u64, size: u64) -> Vec<(u64, u64)> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut current = from;
    while current <= to {
        let end = current.saturating_add(size - 1).min(to);
        chunks.push((current, end));
        if end == u64::MAX {
            break;
        }
        current = end + 1;
    }
    chunks
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDistribution {
    pub nft_type: NftTier,
    pub total_amount: Decimal,
    pub per_wallet_amount: Decimal,
    pub wallet_count: i32,
    pub transaction_hash: String,
    pub log_index: i32,
    pub block_number: i64,
    pub distributed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClaim {
    pub wallet_address: String,
    pub amount: Decimal,
    pub transaction_hash: String,
    pub log_index: i32,
    pub block_number: i64,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another writer stored the same event first
    Duplicate,
}

/// Storage seen by the sync
#[async_trait]
pub trait RewardLedger: Send + Sync {
    async fn distribution_exists(&self, tx_hash: &str, log_index: i32) -> Result<bool, SyncError>;
    async fn insert_distribution(&self, row: NewDistribution) -> Result<InsertOutcome, SyncError>;
    async fn last_distribution_block(&self) -> Result<Option<u64>, SyncError>;

    async fn claim_exists(&self, tx_hash: &str, log_index: i32) -> Result<bool, SyncError>;
    async fn insert_claim(&self, row: NewClaim) -> Result<InsertOutcome, SyncError>;
    async fn last_claim_block(&self) -> Result<Option<u64>, SyncError>;
}

/// `RewardLedger` over the reward_distribution / user_reward_claim tables
#[derive(Clone)]
pub struct DbRewardLedger {
    db: DatabaseConnection,
}

impl DbRewardLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn insert_outcome<T>(result: Result<T, DbErr>) -> Result<InsertOutcome, SyncError> {
    match result {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(InsertOutcome::Duplicate)
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl RewardLedger for DbRewardLedger {
    async fn distribution_exists(&self, tx_hash: &str, log_index: i32) -> Result<bool, SyncError> {
        let count = RewardDistributions::find()
            .filter(reward_distributions::Column::TransactionHash.eq(tx_hash))
            .filter(reward_distributions::Column::LogIndex.eq(log_index))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert_distribution(&self, row: NewDistribution) -> Result<InsertOutcome, SyncError> {
        let model = reward_distributions::ActiveModel {
            nft_type: Set(row.nft_type),
            total_amount: Set(row.total_amount),
            per_wallet_amount: Set(row.per_wallet_amount),
            wallet_count: Set(row.wallet_count),
            transaction_hash: Set(row.transaction_hash),
            log_index: Set(row.log_index),
            block_number: Set(row.block_number),
            distributed_at: Set(row.distributed_at.fixed_offset()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        insert_outcome(model.insert(&self.db).await)
    }

    async fn last_distribution_block(&self) -> Result<Option<u64>, SyncError> {
        let last: Option<i64> = RewardDistributions::find()
            .select_only()
            .column(reward_distributions::Column::BlockNumber)
            .order_by_desc(reward_distributions::Column::BlockNumber)
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(last.map(|n| n.max(0) as u64))
    }

    async fn claim_exists(&self, tx_hash: &str, log_index: i32) -> Result<bool, SyncError> {
        let count = UserRewardClaims::find()
            .filter(user_reward_claims::Column::TransactionHash.eq(tx_hash))
            .filter(user_reward_claims::Column::LogIndex.eq(log_index))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert_claim(&self, row: NewClaim) -> Result<InsertOutcome, SyncError> {
        let model = user_reward_claims::ActiveModel {
            wallet_address: Set(row.wallet_address),
            amount: Set(row.amount),
            transaction_hash: Set(row.transaction_hash),
            log_index: Set(row.log_index),
            block_number: Set(row.block_number),
            claimed_at: Set(row.claimed_at.fixed_offset()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        insert_outcome(model.insert(&self.db).await)
    }

    async fn last_claim_block(&self) -> Result<Option<u64>, SyncError> {
        let last: Option<i64> = UserRewardClaims::find()
            .select_only()
            .column(user_reward_claims::Column::BlockNumber)
            .order_by_desc(user_reward_claims::Column::BlockNumber)
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(last.map(|n| n.max(0) as u64))
    }
}

fn to_i32(value: u64, what: &str) -> Result<i32, SyncError> {
    i32::try_from(value).map_err(|_| SyncError::OutOfRange(format!("{} {}", what, value)))
}

fn to_i64(value: u64, what: &str) -> Result<i64, SyncError> {
    i64::try_from(value).map_err(|_| SyncError::OutOfRange(format!("{} {}", what, value)))
}

fn u256_to_i32(value: U256, what: &str) -> Result<i32, SyncError> {
    u64::try_from(value)
        .map_err(|_| SyncError::OutOfRange(format!("{} {}", what, value)))
        .and_then(|v| to_i32(v, what))
}

fn short(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

pub struct RewardSyncService<C, L> {
    chain: C,
    ledger: L,
    chunk_size: u64,
}

impl<C: RewardsChain, L: RewardLedger> RewardSyncService<C, L> {
    pub fn new(chain: C, ledger: L, chunk_size: u64) -> Self {
        Self {
            chain,
            ledger,
            chunk_size,
        }
    }

    async fn resolve_range(
        &self,
        from_block: Option<u64>,
        last_stored: Option<u64>,
        to_block: BlockTarget,
    ) -> Result<(u64, u64), SyncError> {
        let from = match from_block {
            Some(n) => n,
            None => last_stored.map(|n| n + 1).unwrap_or(0),
        };
        let to = match to_block {
            BlockTarget::Number(n) => n,
            BlockTarget::Latest => self.chain.block_number().await?,
        };
        Ok((from, to))
    }

    /// Block time, or wall-clock time when the header cannot be read
    async fn event_time(&self, block_number: u64) -> DateTime<Utc> {
        match self.chain.block_timestamp(block_number).await {
            Ok(ts) => ts,
            Err(e) => {
                warn!(
                    block_number = block_number,
                    error = %e,
                    "Failed to get block timestamp, falling back to current time"
                );
                Utc::now()
            }
        }
    }

    pub async fn sync_distributions(
        &self,
        from_block: Option<u64>,
        to_block: BlockTarget,
    ) -> Result<SyncReport, SyncError> {
        let last = self.ledger.last_distribution_block().await?;
        let (from, to) = self.resolve_range(from_block, last, to_block).await?;
        info!(from_block = from, to_block = to, "Syncing reward distributions");

        let decimals = self.chain.token_decimals().await;
        let mut report = SyncReport::default();

        for (chunk_start, chunk_end) in chunk_block_range(from, to, self.chunk_size) {
            debug!(chunk_start = chunk_start, chunk_end = chunk_end, "Processing chunk");
            let events = self.chain.distribution_logs(chunk_start, chunk_end).await?;

            for event in events {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable RewardsDistributed log");
                        report.failed += 1;
                        continue;
                    }
                };
                match self.store_distribution(&event, decimals).await {
                    Ok(Some(InsertOutcome::Inserted)) => report.inserted += 1,
                    Ok(_) => report.skipped += 1,
                    Err(e) => {
                        error!(
                            tx_hash = %event.tx_hash,
                            log_index = event.log_index,
                            error = %e,
                            "Failed to store distribution"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed,
            "Reward distribution sync complete"
        );
        Ok(report)
    }

    /// `Ok(None)` means the event was skipped before any write
    async fn store_distribution(
        &self,
        event: &DistributionEvent,
        decimals: u8,
    ) -> Result<Option<InsertOutcome>, SyncError> {
        let log_index = to_i32(event.log_index, "log index")?;
        if self
            .ledger
            .distribution_exists(&event.tx_hash, log_index)
            .await?
        {
            return Ok(None);
        }

        let Some(tier) = NftTier::from_chain_code(event.tier_code) else {
            warn!(
                tier_code = event.tier_code,
                tx_hash = %event.tx_hash,
                "Unknown NFT type, skipping distribution"
            );
            return Ok(None);
        };

        let row = NewDistribution {
            nft_type: tier,
            total_amount: units_to_decimal(event.total_amount, decimals)?,
            per_wallet_amount: units_to_decimal(event.per_wallet, decimals)?,
            wallet_count: u256_to_i32(event.wallet_count, "wallet count")?,
            transaction_hash: event.tx_hash.clone(),
            log_index,
            block_number: to_i64(event.block_number, "block number")?,
            distributed_at: self.event_time(event.block_number).await,
        };

        let outcome = self.ledger.insert_distribution(row).await?;
        if outcome == InsertOutcome::Inserted {
            info!(tier = %tier, tx_hash = %short(&event.tx_hash), "Synced distribution");
        }
        Ok(Some(outcome))
    }

    pub async fn sync_claims(
        &self,
        from_block: Option<u64>,
        to_block: BlockTarget,
        wallet: Option<&str>,
    ) -> Result<SyncReport, SyncError> {
        let last = self.ledger.last_claim_block().await?;
        let (from, to) = self.resolve_range(from_block, last, to_block).await?;
        info!(
            from_block = from,
            to_block = to,
            wallet = ?wallet,
            "Syncing user claims"
        );

        let decimals = self.chain.token_decimals().await;
        let mut report = SyncReport::default();

        for (chunk_start, chunk_end) in chunk_block_range(from, to, self.chunk_size) {
            debug!(chunk_start = chunk_start, chunk_end = chunk_end, "Processing chunk");
            let events = self.chain.claim_logs(chunk_start, chunk_end, wallet).await?;

            for event in events {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable RewardsClaimed log");
                        report.failed += 1;
                        continue;
                    }
                };
                match self.store_claim(&event, decimals).await {
                    Ok(Some(InsertOutcome::Inserted)) => report.inserted += 1,
                    Ok(_) => report.skipped += 1,
                    Err(e) => {
                        error!(
                            tx_hash = %event.tx_hash,
                            log_index = event.log_index,
                            error = %e,
                            "Failed to store claim"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed,
            "User claim sync complete"
        );
        Ok(report)
    }

    async fn store_claim(
        &self,
        event: &ClaimEvent,
        decimals: u8,
    ) -> Result<Option<InsertOutcome>, SyncError> {
        let log_index = to_i32(event.log_index, "log index")?;
        if self.ledger.claim_exists(&event.tx_hash, log_index).await? {
            return Ok(None);
        }

        let row = NewClaim {
            wallet_address: event.user.to_lowercase(),
            amount: units_to_decimal(event.amount, decimals)?,
            transaction_hash: event.tx_hash.clone(),
            log_index,
            block_number: to_i64(event.block_number, "block number")?,
            claimed_at: self.event_time(event.block_number).await,
        };

        let outcome = self.ledger.insert_claim(row).await?;
        if outcome == InsertOutcome::Inserted {
            info!(
                wallet = %short(&event.user),
                tx_hash = %short(&event.tx_hash),
                "Synced claim"
            );
        }
        Ok(Some(outcome))
    }

    /// Distributions first, then claims, over the same bounds
    pub async fn sync_all(
        &self,
        from_block: Option<u64>,
        to_block: BlockTarget,
    ) -> Result<(SyncReport, SyncReport), SyncError> {
        let distributions = self.sync_distributions(from_block, to_block).await?;
        let claims = self.sync_claims(from_block, to_block, None).await?;
        Ok((distributions, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chain::LogResult;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    const WEI: u64 = 1_000_000_000_000_000_000;

    #[derive(Default)]
    struct FakeChain {
        head: u64,
        distributions: Vec<DistributionEvent>,
        claims: Vec<ClaimEvent>,
        timestamps_fail: bool,
        queried: Mutex<Vec<(u64, u64)>>,
    }

    #[async_trait]
    impl RewardsChain for FakeChain {
        async fn block_number(&self) -> Result<u64, ChainError> {
            Ok(self.head)
        }

        async fn token_decimals(&self) -> u8 {
            18
        }

        async fn distribution_logs(
            &self,
            from_block: u64,
            to_block: u64,
        ) -> Result<Vec<LogResult<DistributionEvent>>, ChainError> {
            self.queried.lock().unwrap().push((from_block, to_block));
            Ok(self
                .distributions
                .iter()
                .filter(|e| e.block_number >= from_block && e.block_number <= to_block)
                .cloned()
                .map(Ok)
                .collect())
        }

        async fn claim_logs(
            &self,
            from_block: u64,
            to_block: u64,
            wallet: Option<&str>,
        ) -> Result<Vec<LogResult<ClaimEvent>>, ChainError> {
            Ok(self
                .claims
                .iter()
                .filter(|e| e.block_number >= from_block && e.block_number <= to_block)
                .filter(|e| wallet.is_none_or(|w| w.eq_ignore_ascii_case(&e.user)))
                .cloned()
                .map(Ok)
                .collect())
        }

        async fn block_timestamp(&self, block_number: u64) -> Result<DateTime<Utc>, ChainError> {
            if self.timestamps_fail {
                return Err(ChainError::Rpc("timeout".to_string()));
            }
            Ok(DateTime::from_timestamp(1_700_000_000 + block_number as i64, 0).unwrap())
        }
    }

    #[derive(Default)]
    struct MemoryLedger {
        distributions: Mutex<Vec<NewDistribution>>,
        claims: Mutex<Vec<NewClaim>>,
    }

    #[async_trait]
    impl RewardLedger for MemoryLedger {
        async fn distribution_exists(&self, tx_hash: &str, log_index: i32) -> Result<bool, SyncError> {
            Ok(self
                .distributions
                .lock()
                .unwrap()
                .iter()
                .any(|d| d.transaction_hash == tx_hash && d.log_index == log_index))
        }

        async fn insert_distribution(&self, row: NewDistribution) -> Result<InsertOutcome, SyncError> {
            self.distributions.lock().unwrap().push(row);
            Ok(InsertOutcome::Inserted)
        }

        async fn last_distribution_block(&self) -> Result<Option<u64>, SyncError> {
            Ok(self
                .distributions
                .lock()
                .unwrap()
                .iter()
                .map(|d| d.block_number as u64)
                .max())
        }

        async fn claim_exists(&self, tx_hash: &str, log_index: i32) -> Result<bool, SyncError> {
            Ok(self
                .claims
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.transaction_hash == tx_hash && c.log_index == log_index))
        }

        async fn insert_claim(&self, row: NewClaim) -> Result<InsertOutcome, SyncError> {
            self.claims.lock().unwrap().push(row);
            Ok(InsertOutcome::Inserted)
        }

        async fn last_claim_block(&self) -> Result<Option<u64>, SyncError> {
            Ok(self
                .claims
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.block_number as u64)
                .max())
        }
    }

    fn distribution(tx: &str, log_index: u64, block: u64, tier_code: u8) -> DistributionEvent {
        DistributionEvent {
            tx_hash: tx.to_string(),
            log_index,
            block_number: block,
            tier_code,
            total_amount: U256::from(10_000u64) * U256::from(WEI),
            per_wallet: U256::from(100u64) * U256::from(WEI),
            wallet_count: U256::from(100u64),
        }
    }

    fn claim(tx: &str, log_index: u64, block: u64, user: &str) -> ClaimEvent {
        ClaimEvent {
            tx_hash: tx.to_string(),
            log_index,
            block_number: block,
            user: user.to_string(),
            amount: U256::from(WEI) / U256::from(2u64),
        }
    }

    fn sample_chain() -> FakeChain {
        FakeChain {
            head: 25_000,
            distributions: vec![
                distribution("0xaaa", 0, 100, 0),
                distribution("0xaaa", 1, 100, 5),
                distribution("0xbbb", 0, 12_000, 3),
                distribution("0xccc", 0, 20_000, 9),
            ],
            claims: vec![
                claim("0xddd", 2, 150, "0xabcdef0000000000000000000000000000000001"),
                claim("0xeee", 0, 24_000, "0xabcdef0000000000000000000000000000000002"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_chunk_block_range_covers_exactly_once() {
        let chunks = chunk_block_range(0, 25_000, 10_000);
        assert_eq!(chunks, vec![(0, 9_999), (10_000, 19_999), (20_000, 25_000)]);
    }

    #[test]
    fn test_chunk_block_range_edges() {
        assert_eq!(chunk_block_range(5, 5, 10_000), vec![(5, 5)]);
        assert!(chunk_block_range(10, 9, 10_000).is_empty());
        assert_eq!(chunk_block_range(0, 3, 2), vec![(0, 1), (2, 3)]);
        assert_eq!(chunk_block_range(0, 2, 0), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(
            chunk_block_range(u64::MAX - 1, u64::MAX, 10),
            vec![(u64::MAX - 1, u64::MAX)]
        );
    }

    #[test]
    fn test_block_target_parse() {
        assert_eq!("latest".parse::<BlockTarget>().unwrap(), BlockTarget::Latest);
        assert_eq!("LATEST".parse::<BlockTarget>().unwrap(), BlockTarget::Latest);
        assert_eq!("1234".parse::<BlockTarget>().unwrap(), BlockTarget::Number(1234));
        assert!("abc".parse::<BlockTarget>().is_err());
    }

    #[tokio::test]
    async fn test_sync_distributions_inserts_known_tiers() {
        let service = RewardSyncService::new(sample_chain(), MemoryLedger::default(), 10_000);
        let report = service
            .sync_distributions(Some(0), BlockTarget::Latest)
            .await
            .unwrap();

        assert_eq!(report.inserted, 3);
        assert_eq!(report.skipped, 1); // tier code 9
        assert_eq!(report.failed, 0);

        let rows = service.ledger.distributions.lock().unwrap();
        assert_eq!(rows[0].nft_type, NftTier::Red);
        assert_eq!(rows[1].nft_type, NftTier::FlawlessDiamond);
        assert_eq!(rows[2].nft_type, NftTier::Black);
        assert_eq!(rows[0].total_amount, dec!(10000));
        assert_eq!(rows[0].per_wallet_amount, dec!(100));
        assert_eq!(rows[0].wallet_count, 100);
        assert_eq!(
            rows[0].distributed_at,
            DateTime::from_timestamp(1_700_000_100, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_sync_is_idempotent_over_overlapping_ranges() {
        let service = RewardSyncService::new(sample_chain(), MemoryLedger::default(), 10_000);
        service
            .sync_distributions(Some(0), BlockTarget::Number(15_000))
            .await
            .unwrap();
        let report = service
            .sync_distributions(Some(0), BlockTarget::Latest)
            .await
            .unwrap();

        // The only event past block 15 000 carries an unknown tier
        assert_eq!(report.inserted, 0);
        assert_eq!(service.ledger.distributions.lock().unwrap().len(), 3);

        let again = service
            .sync_distributions(Some(0), BlockTarget::Latest)
            .await
            .unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, 4);
        assert_eq!(service.ledger.distributions.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sync_resumes_after_last_stored_block() {
        let service = RewardSyncService::new(sample_chain(), MemoryLedger::default(), 10_000);
        service
            .sync_distributions(Some(0), BlockTarget::Number(100))
            .await
            .unwrap();
        service.chain.queried.lock().unwrap().clear();

        let report = service
            .sync_distributions(None, BlockTarget::Latest)
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(
            *service.chain.queried.lock().unwrap(),
            vec![(101, 10_100), (10_101, 20_100), (20_101, 25_000)]
        );
    }

    #[tokio::test]
    async fn test_empty_range_does_nothing() {
        let service = RewardSyncService::new(sample_chain(), MemoryLedger::default(), 10_000);
        let report = service
            .sync_distributions(Some(30_000), BlockTarget::Latest)
            .await
            .unwrap();
        assert_eq!(report, SyncReport::default());
        assert!(service.chain.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timestamp_failure_falls_back_to_now() {
        let chain = FakeChain {
            timestamps_fail: true,
            ..sample_chain()
        };
        let service = RewardSyncService::new(chain, MemoryLedger::default(), 10_000);
        let before = Utc::now();
        let report = service
            .sync_distributions(Some(0), BlockTarget::Number(100))
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        let rows = service.ledger.distributions.lock().unwrap();
        assert!(rows.iter().all(|r| r.distributed_at >= before));
    }

    #[tokio::test]
    async fn test_sync_claims_lowercases_and_filters() {
        let mut chain = sample_chain();
        chain.claims.push(claim(
            "0xfff",
            0,
            300,
            "0xABCDEF0000000000000000000000000000000003",
        ));
        let service = RewardSyncService::new(chain, MemoryLedger::default(), 10_000);

        let report = service
            .sync_claims(Some(0), BlockTarget::Latest, Some("0xabcdef0000000000000000000000000000000003"))
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
        {
            let rows = service.ledger.claims.lock().unwrap();
            assert_eq!(rows[0].wallet_address, "0xabcdef0000000000000000000000000000000003");
            assert_eq!(rows[0].amount, dec!(0.5));
        }

        let all = service
            .sync_claims(Some(0), BlockTarget::Latest, None)
            .await
            .unwrap();
        assert_eq!(all.inserted, 2);
        assert_eq!(all.skipped, 1);
    }

    #[tokio::test]
    async fn test_sync_all_runs_both_streams() {
        let service = RewardSyncService::new(sample_chain(), MemoryLedger::default(), 5_000);
        let (distributions, claims) = service
            .sync_all(Some(0), BlockTarget::Latest)
            .await
            .unwrap();
        assert_eq!(distributions.inserted, 3);
        assert_eq!(claims.inserted, 2);
    }

    #[tokio::test]
    async fn test_bad_log_counts_as_failed() {
        struct BrokenChain;

        #[async_trait]
        impl RewardsChain for BrokenChain {
            async fn block_number(&self) -> Result<u64, ChainError> {
                Ok(10)
            }
            async fn token_decimals(&self) -> u8 {
                18
            }
            async fn distribution_logs(
                &self,
                _from_block: u64,
                _to_block: u64,
            ) -> Result<Vec<LogResult<DistributionEvent>>, ChainError> {
                Ok(vec![
                    Err(ChainError::Decode("bad data".to_string())),
                    Ok(distribution("0x111", 0, 5, 1)),
                ])
            }
            async fn claim_logs(
                &self,
                _from_block: u64,
                _to_block: u64,
                _wallet: Option<&str>,
            ) -> Result<Vec<LogResult<ClaimEvent>>, ChainError> {
                Err(ChainError::Rpc("query limit exceeded".to_string()))
            }
            async fn block_timestamp(&self, _block_number: u64) -> Result<DateTime<Utc>, ChainError> {
                Ok(Utc::now())
            }
        }

        let service = RewardSyncService::new(BrokenChain, MemoryLedger::default(), 10_000);
        let report = service
            .sync_distributions(Some(0), BlockTarget::Latest)
            .await
            .unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.failed, 1);

        // A failed chunk query aborts the run
        let err = service
            .sync_claims(Some(0), BlockTarget::Latest, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Chain(ChainError::Rpc(_))));
    }
}
