use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use super::{api_error, ApiError};
use crate::models::community::ExternalUser;
use crate::AppState;

/// Community members reshaped for external consumers
pub async fn external_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExternalUser>>, ApiError> {
    let users = state.community.fetch_users(None).await.map_err(|e| {
        error!(error = %e, "Failed to fetch community users");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to fetch users: {}", e),
        )
    })?;

    Ok(Json(users.iter().map(ExternalUser::from).collect()))
}
