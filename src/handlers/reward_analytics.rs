use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::error;

use super::{api_error, bad_request, ApiError};
use crate::models::analytics::{
    AllNftTypesResponse, AnalyticsQuery, NftTypeRewardsResponse, TotalRewardsResponse,
};
use crate::services::analytics::{self, AnalyticsError};
use crate::AppState;

fn analytics_error(e: AnalyticsError) -> ApiError {
    if e.is_invalid_input() {
        return bad_request(e.to_string());
    }
    error!(error = %e, "Reward analytics query failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub async fn total_rewards(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<TotalRewardsResponse>, ApiError> {
    analytics::total_rewards(&state.db, &query, Utc::now())
        .await
        .map(Json)
        .map_err(analytics_error)
}

pub async fn nft_type_rewards(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<NftTypeRewardsResponse>, ApiError> {
    analytics::nft_type_rewards(&state.db, &query, Utc::now())
        .await
        .map(Json)
        .map_err(analytics_error)
}

pub async fn all_nft_types_rewards(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AllNftTypesResponse>, ApiError> {
    analytics::all_nft_types_rewards(&state.db, &query, Utc::now())
        .await
        .map(Json)
        .map_err(analytics_error)
}
