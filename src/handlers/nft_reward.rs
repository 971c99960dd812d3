use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{bad_request, contains_ci, db_error, filter_value, not_found, paginate, ApiError};
use crate::entities::{nft_rewards, prelude::*};
use crate::models::common::{FlagUpdateRequest, Paginated};
use crate::models::nft_reward::{CreateNftRewardRequest, NftRewardQuery};
use crate::AppState;

pub async fn create_nft_reward(
    State(state): State<AppState>,
    Json(payload): Json<CreateNftRewardRequest>,
) -> Result<(StatusCode, Json<nft_rewards::Model>), ApiError> {
    payload.validate().map_err(bad_request)?;

    let reward = nft_rewards::ActiveModel {
        email: Set(payload.email.trim().to_string()),
        wallet_address: Set(payload.wallet_address.trim().to_string()),
        nft_type: Set(payload.nft_type),
        dit_amount: Set(payload.dit_amount),
        reward_collection_date: Set(Utc::now().fixed_offset()),
        reward_sent: Set(payload.reward_sent),
        ..Default::default()
    };

    let created = reward.insert(&state.db).await.map_err(db_error)?;
    info!(
        id = created.id,
        nft_type = created.nft_type.as_str(),
        dit_amount = %created.dit_amount,
        "NFT reward recorded"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_nft_rewards(
    State(state): State<AppState>,
    Query(query): Query<NftRewardQuery>,
) -> Result<Json<Paginated<nft_rewards::Model>>, ApiError> {
    let kind = query.nft_kind().map_err(bad_request)?;

    let mut select = NftRewards::find();
    if let Some(kind) = kind {
        select = select.filter(nft_rewards::Column::NftType.eq(kind));
    }
    if let Some(wallet) = filter_value(&query.wallet_address) {
        select = select.filter(contains_ci(nft_rewards::Column::WalletAddress, wallet));
    }
    if let Some(sent) = query.reward_sent {
        select = select.filter(nft_rewards::Column::RewardSent.eq(sent));
    }

    let select = select
        .order_by_desc(nft_rewards::Column::RewardCollectionDate)
        .order_by_desc(nft_rewards::Column::Id);

    Ok(Json(paginate(&state.db, select, &query.pagination()).await?))
}

pub async fn set_nft_reward_sent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FlagUpdateRequest>,
) -> Result<Json<nft_rewards::Model>, ApiError> {
    let reward = NftRewards::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("NFT reward not found"))?;

    let mut active = reward.into_active_model();
    active.reward_sent = Set(payload.value);
    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(id, sent = payload.value, "NFT reward flag updated");
    Ok(Json(updated))
}
