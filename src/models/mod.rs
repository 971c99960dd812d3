pub mod admin;
pub mod analytics;
pub mod common;
pub mod community;
pub mod nft_reward;
pub mod purchase;
pub mod reward;
pub mod supply;
