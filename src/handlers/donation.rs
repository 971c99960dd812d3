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
use crate::entities::{donations, prelude::*};
use crate::models::common::{FlagUpdateRequest, Paginated};
use crate::models::purchase::{CreateDonationRequest, DonationQuery};
use crate::AppState;

pub async fn create_donation(
    State(state): State<AppState>,
    Json(payload): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<donations::Model>), ApiError> {
    payload.validate().map_err(bad_request)?;

    let donation = donations::ActiveModel {
        amount: Set(payload.amount),
        usdt_amount: Set(payload.usdt_amount),
        receiver_address: Set(payload.receiver_address.trim().to_string()),
        email_address: Set(payload.email_address.filter(|e| !e.trim().is_empty())),
        purchase_date: Set(Utc::now().fixed_offset()),
        has_dragon: Set(payload.has_dragon),
        dragon_delivered: Set(payload.dragon_delivered),
        ..Default::default()
    };

    let created = donation.insert(&state.db).await.map_err(db_error)?;
    info!(id = created.id, has_dragon = created.has_dragon, "Donation recorded");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_donations(
    State(state): State<AppState>,
    Query(query): Query<DonationQuery>,
) -> Result<Json<Paginated<donations::Model>>, ApiError> {
    let mut select = Donations::find();

    if let Some(receiver) = filter_value(&query.receiver_address) {
        select = select.filter(contains_ci(donations::Column::ReceiverAddress, receiver));
    }
    if let Some(has_dragon) = query.has_dragon {
        select = select.filter(donations::Column::HasDragon.eq(has_dragon));
    }
    if let Some(delivered) = query.dragon_delivered {
        select = select.filter(donations::Column::DragonDelivered.eq(delivered));
    }

    let select = select
        .order_by_desc(donations::Column::PurchaseDate)
        .order_by_desc(donations::Column::Id);

    Ok(Json(paginate(&state.db, select, &query.pagination()).await?))
}

pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<donations::Model>, ApiError> {
    let donation = Donations::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Donation not found"))?;

    Ok(Json(donation))
}

pub async fn set_dragon_delivered(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FlagUpdateRequest>,
) -> Result<Json<donations::Model>, ApiError> {
    let donation = Donations::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Donation not found"))?;

    let mut active = donation.into_active_model();
    active.dragon_delivered = Set(payload.value);
    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(id, delivered = payload.value, "Dragon delivery flag updated");
    Ok(Json(updated))
}
