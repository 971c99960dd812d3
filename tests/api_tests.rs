mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, body_string, get, json_request, offline_app, wallet};

#[tokio::test]
async fn test_total_supply_is_plain_text() {
    let response = offline_app()
        .oneshot(get("/api/coinmarketcap/total-supply"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "100000000");
}

#[tokio::test]
async fn test_circulating_supply_unreachable_node() {
    let response = offline_app()
        .oneshot(get("/api/coinmarketcap/circulating-supply"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to connect to blockchain network");
}

#[tokio::test]
async fn test_supply_overview_unreachable_node() {
    let response = offline_app()
        .oneshot(get("/api/coinmarketcap/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_external_users_upstream_failure() {
    let response = offline_app()
        .oneshot(get("/api/external-users"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Failed to fetch users"));
}

#[tokio::test]
async fn test_admin_community_pages_render_empty_on_failure() {
    for uri in ["/admin/community-members", "/admin/community-events"] {
        let response = offline_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let page = body_string(response).await;
        assert!(page.contains("<table>"));
        assert!(page.contains("No records"));
    }
}

#[tokio::test]
async fn test_admin_tables_reject_unknown_tier() {
    for uri in [
        "/admin/reward-distributions?nft_type=PURPLE",
        "/admin/nft-rewards?nft_type=purpleNFT",
    ] {
        let response = offline_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid nft_type"));
    }
}

#[tokio::test]
async fn test_admin_tables_reject_page_zero() {
    for uri in ["/admin/memberships?page=0", "/admin/donations?page=0&has_dragon=true"] {
        let response = offline_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_unknown_period_rejected() {
    let response = offline_app()
        .oneshot(get("/api/rewards/total?period=fortnight"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_period_requires_dates() {
    let response = offline_app()
        .oneshot(get("/api/rewards/total?period=custom&start_date=2026-01-01"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "start_date and end_date are required for custom period"
    );
}

#[tokio::test]
async fn test_custom_period_bad_date_format() {
    let response = offline_app()
        .oneshot(get(
            "/api/rewards/all-nft-types?period=custom&start_date=01-01-2026&end_date=2026-01-31",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD");
}

#[tokio::test]
async fn test_nft_type_rewards_requires_type() {
    let response = offline_app()
        .oneshot(get("/api/rewards/nft-type?period=week"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "nft_type parameter is required");
}

#[tokio::test]
async fn test_distribution_list_rejects_unknown_tier() {
    let response = offline_app()
        .oneshot(get("/api/rewards/distributions?nft_type=GOLD"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("FLAWLESS_DIAMOND"));
}

#[tokio::test]
async fn test_page_zero_is_invalid() {
    let response = offline_app()
        .oneshot(get("/api/presale?page=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid page");
}

#[tokio::test]
async fn test_bulk_distribute_empty_request() {
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/api/rewards/bulk-distribute",
            json!({ "distributions": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "distributions cannot be empty");
}

#[tokio::test]
async fn test_bulk_distribute_group_with_empty_wallet_list() {
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/api/rewards/bulk-distribute",
            json!({
                "distributions": [
                    {
                        "nft_type": "RED",
                        "eligible_wallets": [wallet(1)],
                        "total_dit_amount": "10"
                    },
                    {
                        "nft_type": "BLUE",
                        "eligible_wallets": [],
                        "total_dit_amount": "10"
                    }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "eligible_wallets cannot be empty for BLUE");
}

#[tokio::test]
async fn test_mark_sent_requires_ids() {
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/api/rewards/pending/mark-sent",
            json!({ "ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
