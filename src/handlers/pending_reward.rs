use std::collections::BTreeMap;

use axum::{extract::{Query, State}, Json};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

use super::{bad_request, db_error, equals_ci, filter_value, ApiError};
use crate::entities::{pending_rewards, prelude::*, sea_orm_active_enums::NftTier};
use crate::models::reward::{
    parse_tier_filter, MarkSentRequest, MarkSentResponse, PendingRewardQuery, PendingRewardSummary,
    PendingTierSummary,
};
use crate::services::distribution::mark_pending_sent;
use crate::AppState;

/// Per-tier totals ordered by tier label
pub fn summarize(rows: &[(NftTier, Decimal)]) -> Vec<PendingTierSummary> {
    let mut by_tier: BTreeMap<&'static str, PendingTierSummary> = BTreeMap::new();
    for (tier, amount) in rows {
        let entry = by_tier.entry(tier.as_str()).or_insert(PendingTierSummary {
            nft_type: *tier,
            total_amount: Decimal::ZERO,
            count: 0,
        });
        entry.total_amount += *amount;
        entry.count += 1;
    }
    by_tier.into_values().collect()
}

pub async fn pending_summary(
    State(state): State<AppState>,
    Query(query): Query<PendingRewardQuery>,
) -> Result<Json<PendingRewardSummary>, ApiError> {
    let tier = parse_tier_filter(query.nft_type.as_deref()).map_err(bad_request)?;
    let wallet = filter_value(&query.wallet_address);

    let mut select = PendingRewards::find();
    if let Some(wallet) = wallet {
        select = select.filter(equals_ci(pending_rewards::Column::WalletAddress, wallet));
    }
    if let Some(tier) = tier {
        select = select.filter(pending_rewards::Column::NftType.eq(tier));
    }
    if let Some(sent) = query.is_sent {
        select = select.filter(pending_rewards::Column::IsSent.eq(sent));
    }

    let rows: Vec<(NftTier, Decimal)> = select
        .select_only()
        .column(pending_rewards::Column::NftType)
        .column(pending_rewards::Column::DitAmount)
        .into_tuple()
        .all(&state.db)
        .await
        .map_err(db_error)?;

    Ok(Json(PendingRewardSummary {
        total_pending_rewards: rows.iter().map(|(_, amount)| *amount).sum(),
        total_pending_count: rows.len() as u64,
        rewards_by_nft_type: summarize(&rows),
        wallet_address: wallet.map(str::to_string),
    }))
}

pub async fn mark_sent(
    State(state): State<AppState>,
    Json(payload): Json<MarkSentRequest>,
) -> Result<Json<MarkSentResponse>, ApiError> {
    if payload.ids.is_empty() {
        return Err(bad_request("ids cannot be empty"));
    }

    let updated = mark_pending_sent(&state.db, &payload.ids)
        .await
        .map_err(db_error)?;
    Ok(Json(MarkSentResponse { updated }))
}
