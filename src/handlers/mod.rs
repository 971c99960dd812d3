//! HTTP handlers
//!
//! Handlers return `Result<_, ApiError>` so every failure carries a JSON
//! `{"error": ...}` body with the matching status code.

pub mod admin;
pub mod community;
pub mod donation;
pub mod membership;
pub mod nft_reward;
pub mod pending_reward;
pub mod presale;
pub mod reward_analytics;
pub mod reward_claim;
pub mod reward_distribution;
pub mod supply;

use axum::{http::StatusCode, Json};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select};
use tracing::error;

use crate::models::common::{check_page, ErrorResponse, PageQuery, Paginated};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, message)
}

pub(crate) fn not_found(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::NOT_FOUND, message)
}

pub(crate) fn db_error(e: DbErr) -> ApiError {
    error!(error = %e, "Database error");
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Database error: {}", e),
    )
}

/// Escape LIKE wildcards so user input only ever matches literally
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on a text column
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Case-insensitive equality on a text column
pub(crate) fn equals_ci<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.trim().to_lowercase())
}

/// Non-blank query string value
pub(crate) fn filter_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Run `select` one page at a time. A page past the end is a 404.
pub(crate) async fn paginate<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    pagination: &PageQuery,
) -> Result<Paginated<E::Model>, ApiError>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let (page, page_size) = pagination.resolve().map_err(not_found)?;
    let paginator = select.paginate(db, page_size);

    let count = paginator.num_items().await.map_err(db_error)?;
    check_page(page, count, page_size).map_err(not_found)?;

    let results = paginator.fetch_page(page - 1).await.map_err(db_error)?;
    Ok(Paginated::new(results, count, page, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{donations, prelude::*};
    use sea_orm::{DbBackend, QueryFilter, QueryTrait};

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("0xabc"), "0xabc");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_contains_ci_declares_escape() {
        let sql = Donations::find()
            .filter(contains_ci(donations::Column::ReceiverAddress, "0xAB_"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("LOWER("), "{sql}");
        assert!(sql.contains("LIKE"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
        assert!(!sql.contains("0xAB"), "{sql}");
    }
}
