use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use super::{
    api_error, bad_request, contains_ci, db_error, equals_ci, filter_value, not_found, paginate,
    ApiError,
};
use crate::entities::{prelude::*, user_reward_claims};
use crate::models::common::Paginated;
use crate::models::reward::{ClaimQuery, CreateClaimRequest, WalletClaimsResponse};
use crate::AppState;

pub async fn list_claims(
    State(state): State<AppState>,
    Query(query): Query<ClaimQuery>,
) -> Result<Json<Paginated<user_reward_claims::Model>>, ApiError> {
    let mut select = UserRewardClaims::find();
    if let Some(wallet) = filter_value(&query.wallet_address) {
        select = select.filter(contains_ci(user_reward_claims::Column::WalletAddress, wallet));
    }

    let select = select
        .order_by_desc(user_reward_claims::Column::ClaimedAt)
        .order_by_desc(user_reward_claims::Column::Id);

    Ok(Json(paginate(&state.db, select, &query.pagination()).await?))
}

pub async fn create_claim(
    State(state): State<AppState>,
    Json(payload): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<user_reward_claims::Model>), ApiError> {
    payload.validate().map_err(bad_request)?;

    let existing = UserRewardClaims::find()
        .filter(user_reward_claims::Column::TransactionHash.eq(&payload.transaction_hash))
        .filter(user_reward_claims::Column::LogIndex.eq(payload.log_index))
        .one(&state.db)
        .await
        .map_err(db_error)?;
    if existing.is_some() {
        return Err(api_error(
            StatusCode::CONFLICT,
            "Claim already recorded for this transaction hash and log index",
        ));
    }

    let now = Utc::now().fixed_offset();
    let claim = user_reward_claims::ActiveModel {
        wallet_address: Set(payload.wallet_address.trim().to_lowercase()),
        amount: Set(payload.amount),
        transaction_hash: Set(payload.transaction_hash.clone()),
        log_index: Set(payload.log_index),
        block_number: Set(payload.block_number),
        claimed_at: Set(payload.claimed_at.unwrap_or(now)),
        created_at: Set(now),
        ..Default::default()
    };

    let created = claim.insert(&state.db).await.map_err(db_error)?;
    info!(id = created.id, wallet = %created.wallet_address, amount = %created.amount, "Claim recorded");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn wallet_claims(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<WalletClaimsResponse>, ApiError> {
    let claims = UserRewardClaims::find()
        .filter(equals_ci(user_reward_claims::Column::WalletAddress, &wallet_address))
        .order_by_desc(user_reward_claims::Column::ClaimedAt)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    if claims.is_empty() {
        return Err(not_found("No claims found for this wallet address"));
    }

    let total_claimed: Decimal = claims.iter().map(|c| c.amount).sum();
    Ok(Json(WalletClaimsResponse {
        wallet_address,
        total_claimed,
        total_claims_count: claims.len(),
        claims,
    }))
}
