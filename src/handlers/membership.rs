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
use crate::entities::{memberships, prelude::*};
use crate::models::common::{FlagUpdateRequest, Paginated};
use crate::models::purchase::{CreateMembershipRequest, MembershipQuery};
use crate::AppState;

pub async fn create_membership(
    State(state): State<AppState>,
    Json(payload): Json<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<memberships::Model>), ApiError> {
    payload.validate().map_err(bad_request)?;

    let membership = memberships::ActiveModel {
        usdt_amount: Set(payload.usdt_amount),
        crypto_currency: Set(payload.crypto_currency.trim().to_string()),
        email: Set(payload.email.filter(|e| !e.trim().is_empty())),
        quantity: Set(payload.quantity),
        purchase_date: Set(Utc::now().fixed_offset()),
        receiver_address: Set(payload.receiver_address.trim().to_string()),
        membership_added: Set(payload.membership_added),
        ..Default::default()
    };

    let created = membership.insert(&state.db).await.map_err(db_error)?;
    info!(id = created.id, "Membership recorded");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_memberships(
    State(state): State<AppState>,
    Query(query): Query<MembershipQuery>,
) -> Result<Json<Paginated<memberships::Model>>, ApiError> {
    let mut select = Memberships::find();

    if let Some(receiver) = filter_value(&query.receiver_address) {
        select = select.filter(contains_ci(memberships::Column::ReceiverAddress, receiver));
    }
    if let Some(currency) = filter_value(&query.crypto_currency) {
        select = select.filter(memberships::Column::CryptoCurrency.eq(currency));
    }
    if let Some(added) = query.membership_added {
        select = select.filter(memberships::Column::MembershipAdded.eq(added));
    }

    let select = select
        .order_by_desc(memberships::Column::PurchaseDate)
        .order_by_desc(memberships::Column::Id);

    Ok(Json(paginate(&state.db, select, &query.pagination()).await?))
}

pub async fn set_membership_added(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FlagUpdateRequest>,
) -> Result<Json<memberships::Model>, ApiError> {
    let membership = Memberships::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("Membership not found"))?;

    let mut active = membership.into_active_model();
    active.membership_added = Set(payload.value);
    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(id, added = payload.value, "Membership flag updated");
    Ok(Json(updated))
}
