use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    admin, community, donation, membership, nft_reward, pending_reward, presale,
    reward_analytics, reward_claim, reward_distribution, supply,
};
use crate::AppState;

async fn root() -> &'static str {
    "DIORA backend"
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let purchases = Router::new()
        .route(
            "/presale",
            get(presale::list_presales).post(presale::create_presale),
        )
        .route("/presale/{id}/delivered", patch(presale::set_presale_delivered))
        .route(
            "/membership",
            get(membership::list_memberships).post(membership::create_membership),
        )
        .route("/membership/{id}/added", patch(membership::set_membership_added))
        .route(
            "/donation",
            get(donation::list_donations).post(donation::create_donation),
        )
        .route("/donation/{id}", get(donation::get_donation))
        .route("/donation/{id}/dragon", patch(donation::set_dragon_delivered))
        .route(
            "/nft-reward",
            get(nft_reward::list_nft_rewards).post(nft_reward::create_nft_reward),
        )
        .route("/nft-reward/{id}/sent", patch(nft_reward::set_nft_reward_sent));

    let rewards = Router::new()
        .route(
            "/distributions",
            get(reward_distribution::list_distributions)
                .post(reward_distribution::create_distribution),
        )
        .route("/bulk-distribute", post(reward_distribution::bulk_distribute))
        .route("/pending", get(pending_reward::pending_summary))
        .route("/pending/mark-sent", post(pending_reward::mark_sent))
        .route(
            "/claims",
            get(reward_claim::list_claims).post(reward_claim::create_claim),
        )
        .route("/claims/{wallet_address}", get(reward_claim::wallet_claims))
        .route("/total", get(reward_analytics::total_rewards))
        .route("/nft-type", get(reward_analytics::nft_type_rewards))
        .route("/all-nft-types", get(reward_analytics::all_nft_types_rewards));

    let coinmarketcap = Router::new()
        .route("/coinmarketcap", get(supply::supply_overview))
        .route("/coinmarketcap/", get(supply::supply_overview))
        .route("/coinmarketcap/total-supply", get(supply::total_supply))
        .route(
            "/coinmarketcap/circulating-supply",
            get(supply::circulating_supply),
        );

    let admin_pages = Router::new()
        .route("/community-members", get(admin::community_members))
        .route("/community-events", get(admin::community_events))
        .route("/reward-distributions", get(admin::reward_distributions_page))
        .route("/reward-claims", get(admin::reward_claims_page))
        .route("/presales", get(admin::presales_page))
        .route("/memberships", get(admin::memberships_page))
        .route("/donations", get(admin::donations_page))
        .route("/nft-rewards", get(admin::nft_rewards_page));

    let api = purchases
        .nest("/rewards", rewards)
        .merge(coinmarketcap)
        .route("/external-users", get(community::external_users));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .nest("/admin", admin_pages)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
