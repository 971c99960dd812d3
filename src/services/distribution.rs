//! Admin-triggered bulk reward distribution
//!
//! A request carries several tier groups. Each group becomes one
//! `reward_distribution` row plus one `pending_reward` row per eligible
//! wallet. The whole batch is planned up front and written in a single
//! transaction, so a bad group leaves nothing behind.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionError, TransactionTrait,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::entities::{
    pending_rewards, prelude::*, reward_distributions, sea_orm_active_enums::NftTier,
};
use crate::models::reward::{
    BulkDistributeRequest, BulkDistributeResponse, BulkDistributionGroup, BulkDistributionResult,
};

/// Stored amounts carry six decimal places
pub const AMOUNT_SCALE: u32 = 6;

const ADDRESS_PREFIX: &str = "0x";
const ADDRESS_LEN: usize = 42;

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("eligible_wallets cannot be empty for {0}")]
    EmptyWallets(NftTier),

    #[error("Amount too small for {0}")]
    AmountTooSmall(NftTier),

    #[error("A distribution with this transaction hash is already recorded")]
    AlreadyRecorded,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DistributionError {
    /// True when the request itself is at fault
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, DistributionError::Database(_))
    }
}

/// Trim and lowercase a wallet, rejecting anything that is not `0x` + 40 chars
pub fn normalize_wallet(raw: &str) -> Option<String> {
    let wallet = raw.trim().to_lowercase();
    (wallet.starts_with(ADDRESS_PREFIX) && wallet.len() == ADDRESS_LEN).then_some(wallet)
}

/// A validated group, ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGroup {
    pub nft_type: NftTier,
    pub requested_amount: Decimal,
    /// `per_wallet_amount * wallets.len()`, what the pending rows add up to
    pub total_amount: Decimal,
    pub per_wallet_amount: Decimal,
    pub wallets: Vec<String>,
}

/// Validate every group and compute per-wallet amounts.
///
/// Malformed wallets are dropped. A group that submits no wallet at all, a
/// non-positive total or a per-wallet amount that rounds to zero fails the
/// whole plan.
///
/// The split divides by the valid wallets. When every submitted wallet is
/// malformed the divisor falls back to the submitted count, and the group is
/// kept with no wallets and a zero total.
pub fn plan_bulk_distribution(
    groups: &[BulkDistributionGroup],
) -> Result<Vec<PlannedGroup>, DistributionError> {
    groups
        .iter()
        .map(|group| {
            let wallets: Vec<String> = group
                .eligible_wallets
                .iter()
                .filter_map(|w| normalize_wallet(w))
                .collect();

            let dropped = group.eligible_wallets.len() - wallets.len();
            if dropped > 0 {
                debug!(tier = %group.nft_type, dropped = dropped, "Dropped malformed wallets");
            }

            if group.eligible_wallets.is_empty() {
                return Err(DistributionError::EmptyWallets(group.nft_type));
            }
            if group.total_dit_amount <= Decimal::ZERO {
                return Err(DistributionError::AmountTooSmall(group.nft_type));
            }

            let divisor = if wallets.is_empty() {
                group.eligible_wallets.len()
            } else {
                wallets.len()
            };
            let count = Decimal::from(wallets.len() as u64);
            let per_wallet_amount = (group.total_dit_amount / Decimal::from(divisor as u64))
                .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::ToZero);
            if per_wallet_amount <= Decimal::ZERO {
                return Err(DistributionError::AmountTooSmall(group.nft_type));
            }

            Ok(PlannedGroup {
                nft_type: group.nft_type,
                requested_amount: group.total_dit_amount,
                total_amount: per_wallet_amount * count,
                per_wallet_amount,
                wallets,
            })
        })
        .collect()
}

/// Plan and persist a bulk distribution atomically
pub async fn execute_bulk_distribution(
    db: &DatabaseConnection,
    request: &BulkDistributeRequest,
) -> Result<BulkDistributeResponse, DistributionError> {
    let plan = plan_bulk_distribution(&request.distributions)?;
    let transaction_hash = request.transaction_hash.clone().unwrap_or_default();
    let block_number = request.block_number.unwrap_or(0);

    let results = db
        .transaction(|txn| {
            let plan = plan.clone();
            let transaction_hash = transaction_hash.clone();
            Box::pin(async move {
                let now = Utc::now().fixed_offset();
                let mut results = Vec::with_capacity(plan.len());

                for (position, group) in plan.iter().enumerate() {
                    let distribution = reward_distributions::ActiveModel {
                        nft_type: Set(group.nft_type),
                        total_amount: Set(group.total_amount),
                        per_wallet_amount: Set(group.per_wallet_amount),
                        wallet_count: Set(group.wallets.len() as i32),
                        transaction_hash: Set(transaction_hash.clone()),
                        log_index: Set(position as i32),
                        block_number: Set(block_number),
                        distributed_at: Set(now),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let rows = group.wallets.iter().map(|wallet| pending_rewards::ActiveModel {
                        wallet_address: Set(wallet.clone()),
                        nft_type: Set(group.nft_type),
                        dit_amount: Set(group.per_wallet_amount),
                        distribution_id: Set(distribution.id),
                        is_sent: Set(false),
                        sent_at: Set(None),
                        created_at: Set(now),
                        ..Default::default()
                    });
                    if !group.wallets.is_empty() {
                        PendingRewards::insert_many(rows).exec(txn).await?;
                    }

                    results.push(BulkDistributionResult {
                        distribution_id: distribution.id,
                        nft_type: group.nft_type,
                        total_dit_amount: group.total_amount,
                        per_wallet_amount: group.per_wallet_amount,
                        wallet_count: distribution.wallet_count,
                        pending_rewards_created: group.wallets.len(),
                    });
                }

                Ok::<_, DistributionError>(results)
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Transaction(DistributionError::Database(err))
            | TransactionError::Connection(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => DistributionError::AlreadyRecorded,
                _ => DistributionError::Database(err),
            },
            TransactionError::Transaction(inner) => inner,
        })?;

    let total_wallets: usize = results.iter().map(|r| r.pending_rewards_created).sum();
    let total_dit_distributed: Decimal = results.iter().map(|r| r.total_dit_amount).sum();

    info!(
        distributions = results.len(),
        wallets = total_wallets,
        total = %total_dit_distributed,
        "Bulk distribution stored"
    );

    Ok(BulkDistributeResponse {
        message: "Successfully distributed rewards".to_string(),
        total_distributions: results.len(),
        total_wallets,
        total_dit_distributed,
        distributions: results,
    })
}

/// Flag pending rewards as sent; already-sent rows are left untouched
pub async fn mark_pending_sent(db: &DatabaseConnection, ids: &[i32]) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = PendingRewards::update_many()
        .col_expr(pending_rewards::Column::IsSent, Expr::value(true))
        .col_expr(
            pending_rewards::Column::SentAt,
            Expr::value(Utc::now().fixed_offset()),
        )
        .filter(pending_rewards::Column::Id.is_in(ids.iter().copied()))
        .filter(pending_rewards::Column::IsSent.eq(false))
        .exec(db)
        .await?;

    info!(requested = ids.len(), updated = result.rows_affected, "Marked pending rewards sent");
    Ok(result.rows_affected)
}
