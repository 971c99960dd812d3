use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{error, info, warn};

use super::{api_error, bad_request, db_error, not_found, ApiError};
use crate::entities::{prelude::*, reward_distributions};
use crate::models::common::Paginated;
use crate::models::reward::{
    parse_tier_filter, BulkDistributeRequest, BulkDistributeResponse, CreateDistributionRequest,
    DistributionEntry, DistributionGroup, DistributionQuery,
};
use crate::services::distribution::execute_bulk_distribution;
use crate::AppState;

/// Fold distributions into per-transaction groups, keeping input order
pub fn group_by_transaction(rows: Vec<reward_distributions::Model>) -> Vec<DistributionGroup> {
    let mut groups: Vec<DistributionGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let idx = *index.entry(row.transaction_hash.clone()).or_insert_with(|| {
            groups.push(DistributionGroup {
                transaction_hash: row.transaction_hash.clone(),
                block_number: row.block_number,
                distributed_at: row.distributed_at,
                distributions: Vec::new(),
                total_amount_all_types: Decimal::ZERO,
                total_wallets_all_types: 0,
                total_distributions: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[idx];
        group.total_amount_all_types += row.total_amount;
        group.total_wallets_all_types += row.wallet_count as i64;
        group.total_distributions += 1;
        group.distributions.push(DistributionEntry {
            id: row.id,
            nft_type: row.nft_type,
            total_amount: row.total_amount,
            per_wallet_amount: row.per_wallet_amount,
            wallet_count: row.wallet_count,
            log_index: row.log_index,
        });
    }

    groups
}

pub async fn list_distributions(
    State(state): State<AppState>,
    Query(query): Query<DistributionQuery>,
) -> Result<Json<Paginated<DistributionGroup>>, ApiError> {
    let tier = parse_tier_filter(query.nft_type.as_deref()).map_err(bad_request)?;
    let (page, page_size) = query.pagination().resolve().map_err(not_found)?;

    let mut select = RewardDistributions::find();
    if let Some(tier) = tier {
        select = select.filter(reward_distributions::Column::NftType.eq(tier));
    }
    let rows = select
        .order_by_desc(reward_distributions::Column::DistributedAt)
        .order_by_asc(reward_distributions::Column::TransactionHash)
        .order_by_asc(reward_distributions::Column::LogIndex)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let groups = group_by_transaction(rows);
    let page = Paginated::from_vec(groups, page, page_size).map_err(not_found)?;
    Ok(Json(page))
}

pub async fn create_distribution(
    State(state): State<AppState>,
    Json(payload): Json<CreateDistributionRequest>,
) -> Result<(StatusCode, Json<reward_distributions::Model>), ApiError> {
    payload.validate().map_err(bad_request)?;

    let existing = RewardDistributions::find()
        .filter(reward_distributions::Column::TransactionHash.eq(&payload.transaction_hash))
        .filter(reward_distributions::Column::LogIndex.eq(payload.log_index))
        .one(&state.db)
        .await
        .map_err(db_error)?;
    if existing.is_some() {
        return Err(api_error(
            StatusCode::CONFLICT,
            "Distribution already recorded for this transaction hash and log index",
        ));
    }

    let now = Utc::now().fixed_offset();
    let distribution = reward_distributions::ActiveModel {
        nft_type: Set(payload.nft_type),
        total_amount: Set(payload.total_amount),
        per_wallet_amount: Set(payload.per_wallet_amount),
        wallet_count: Set(payload.wallet_count),
        transaction_hash: Set(payload.transaction_hash.clone()),
        log_index: Set(payload.log_index),
        block_number: Set(payload.block_number),
        distributed_at: Set(payload.distributed_at.unwrap_or(now)),
        created_at: Set(now),
        ..Default::default()
    };

    let created = distribution.insert(&state.db).await.map_err(db_error)?;
    info!(
        id = created.id,
        tx = %created.transaction_hash,
        tier = %created.nft_type,
        "Distribution recorded"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn bulk_distribute(
    State(state): State<AppState>,
    Json(payload): Json<BulkDistributeRequest>,
) -> Result<(StatusCode, Json<BulkDistributeResponse>), ApiError> {
    payload.validate().map_err(bad_request)?;

    match execute_bulk_distribution(&state.db, &payload).await {
        Ok(response) => Ok((StatusCode::CREATED, Json(response))),
        Err(e) if e.is_invalid_input() => {
            warn!(error = %e, "Rejected bulk distribution");
            Err(bad_request(e.to_string()))
        }
        Err(e) => {
            error!(error = %e, "Bulk distribution failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to distribute rewards: {}", e),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::NftTier;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn row(id: i32, tx: &str, tier: NftTier, total: Decimal, wallets: i32) -> reward_distributions::Model {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 2, 1, 12, 0, 0)
            .unwrap();
        reward_distributions::Model {
            id,
            nft_type: tier,
            total_amount: total,
            per_wallet_amount: total / Decimal::from(wallets),
            wallet_count: wallets,
            transaction_hash: tx.to_string(),
            log_index: id,
            block_number: 100,
            distributed_at: at,
            created_at: at,
        }
    }

    #[test]
    fn test_group_by_transaction_sums_each_hash() {
        let groups = group_by_transaction(vec![
            row(1, "0xaa", NftTier::Red, dec!(100), 4),
            row(2, "0xaa", NftTier::Dragon, dec!(50), 2),
            row(3, "0xbb", NftTier::Blue, dec!(30), 3),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].transaction_hash, "0xaa");
        assert_eq!(groups[0].total_amount_all_types, dec!(150));
        assert_eq!(groups[0].total_wallets_all_types, 6);
        assert_eq!(groups[0].total_distributions, 2);
        assert_eq!(groups[1].distributions[0].nft_type, NftTier::Blue);
    }

    #[test]
    fn test_group_by_transaction_keeps_first_seen_order() {
        let groups = group_by_transaction(vec![
            row(1, "0xbb", NftTier::Red, dec!(1), 1),
            row(2, "0xaa", NftTier::Red, dec!(1), 1),
            row(3, "0xbb", NftTier::Green, dec!(1), 1),
        ]);
        let hashes: Vec<&str> = groups.iter().map(|g| g.transaction_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xbb", "0xaa"]);
        assert_eq!(groups[0].distributions.len(), 2);
    }
}
