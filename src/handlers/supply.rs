//! CoinMarketCap supply endpoints

use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use tracing::error;

use super::{api_error, ApiError};
use crate::models::supply::SupplyResponse;
use crate::services::supply::{SupplyBreakdown, SupplyError, TOTAL_SUPPLY};
use crate::AppState;

fn supply_error(e: SupplyError, context: &str) -> ApiError {
    error!(error = %e, "{}", context);
    match e {
        SupplyError::Connection(_) => api_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        other => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}: {}", context, other),
        ),
    }
}

async fn fetch(state: &AppState, context: &str) -> Result<SupplyBreakdown, ApiError> {
    state
        .supply
        .fetch()
        .await
        .map_err(|e| supply_error(e, context))
}

pub async fn supply_overview(
    State(state): State<AppState>,
) -> Result<Json<SupplyResponse>, ApiError> {
    let supply = fetch(&state, "Failed to fetch token supply data").await?;
    Ok(Json(SupplyResponse {
        total_supply: supply.total_supply,
        circulating_supply: supply.circulating_supply,
        excluded_wallets_balance: supply.excluded_wallets_balance,
        max_supply: Decimal::from(TOTAL_SUPPLY),
    }))
}

/// Plain-text total supply; needs no chain access
pub async fn total_supply() -> String {
    TOTAL_SUPPLY.to_string()
}

pub async fn circulating_supply(State(state): State<AppState>) -> Result<String, ApiError> {
    let supply = fetch(&state, "Failed to fetch circulating supply").await?;
    Ok(supply.circulating_supply.normalize().to_string())
}
