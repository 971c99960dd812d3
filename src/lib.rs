// src/lib.rs

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use config::AppConfig;
use services::{community::CommunityApiService, supply::SupplyService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub supply: SupplyService,
    pub community: CommunityApiService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let supply = SupplyService::new(
            config.supply_rpc_url.clone(),
            config.dit_token_address.clone(),
            config.excluded_wallets.clone(),
        );
        let community = CommunityApiService::new(
            config.community_api_base_url.clone(),
            config.community_api_access_token.clone(),
        );

        Self {
            db,
            config: Arc::new(config),
            supply,
            community,
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod sea_orm_active_enums;
    pub mod donations;
    pub mod memberships;
    pub mod nft_rewards;
    pub mod pending_rewards;
    pub mod presales;
    pub mod reward_distributions;
    pub mod user_reward_claims;
}

pub mod services {
    pub mod analytics;
    pub mod chain;
    pub mod community;
    pub mod distribution;
    pub mod reward_sync;
    pub mod supply;
}

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
