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
use crate::entities::{prelude::*, presales};
use crate::models::common::{FlagUpdateRequest, Paginated};
use crate::models::purchase::{CreatePresaleRequest, PresaleQuery};
use crate::AppState;

pub async fn create_presale(
    State(state): State<AppState>,
    Json(payload): Json<CreatePresaleRequest>,
) -> Result<(StatusCode, Json<presales::Model>), ApiError> {
    payload.validate().map_err(bad_request)?;

    let presale = presales::ActiveModel {
        dit_amount: Set(payload.dit_amount),
        usdt_amount: Set(payload.usdt_amount),
        crypto_currency: Set(payload.crypto_currency.trim().to_string()),
        purchase_date: Set(Utc::now().fixed_offset()),
        receiver_address: Set(payload.receiver_address.trim().to_string()),
        tokens_delivered: Set(payload.tokens_delivered),
        ..Default::default()
    };

    let created = presale.insert(&state.db).await.map_err(db_error)?;
    info!(id = created.id, dit_amount = %created.dit_amount, "Presale recorded");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_presales(
    State(state): State<AppState>,
    Query(query): Query<PresaleQuery>,
) -> Result<Json<Paginated<presales::Model>>, ApiError> {
    let mut select = Presales::find();

    if let Some(receiver) = filter_value(&query.receiver_address) {
        select = select.filter(contains_ci(presales::Column::ReceiverAddress, receiver));
    }
    if let Some(currency) = filter_value(&query.crypto_currency) {
        select = select.filter(presales::Column::CryptoCurrency.eq(currency));
    }
    if let Some(delivered) = query.tokens_delivered {
        select = select.filter(presales::Column::TokensDelivered.eq(delivered));
    }

    let select = select
        .order_by_desc(presales::Column::PurchaseDate)
        .order_by_desc(presales::Column::Id);

    Ok(Json(paginate(&state.db, select, &query.pagination()).await?))
}

pub async fn set_presale_delivered(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FlagUpdateRequest>,
) -> Result<Json<presales::Model>, ApiError> {
    let presale = Presales::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Presale not found"))?;

    let mut active = presale.into_active_model();
    active.tokens_delivered = Set(payload.value);
    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(id, delivered = payload.value, "Presale delivery flag updated");
    Ok(Json(updated))
}
