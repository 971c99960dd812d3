//! `SeaORM` string-backed enums shared by the reward tables

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Reward tier of a distribution, as emitted by the distributor contract
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum NftTier {
    #[sea_orm(string_value = "RED")]
    #[serde(rename = "RED")]
    Red,
    #[sea_orm(string_value = "GREEN")]
    #[serde(rename = "GREEN")]
    Green,
    #[sea_orm(string_value = "BLUE")]
    #[serde(rename = "BLUE")]
    Blue,
    #[sea_orm(string_value = "BLACK")]
    #[serde(rename = "BLACK")]
    Black,
    #[sea_orm(string_value = "DRAGON")]
    #[serde(rename = "DRAGON")]
    Dragon,
    #[sea_orm(string_value = "FLAWLESS_DIAMOND")]
    #[serde(rename = "FLAWLESS_DIAMOND")]
    FlawlessDiamond,
}

impl NftTier {
    pub const ALL: [NftTier; 6] = [
        NftTier::Red,
        NftTier::Green,
        NftTier::Blue,
        NftTier::Black,
        NftTier::Dragon,
        NftTier::FlawlessDiamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NftTier::Red => "RED",
            NftTier::Green => "GREEN",
            NftTier::Blue => "BLUE",
            NftTier::Black => "BLACK",
            NftTier::Dragon => "DRAGON",
            NftTier::FlawlessDiamond => "FLAWLESS_DIAMOND",
        }
    }

    /// Case-insensitive label lookup
    pub fn parse(label: &str) -> Option<Self> {
        let upper = label.trim().to_uppercase();
        Self::ALL.into_iter().find(|tier| tier.as_str() == upper)
    }

    /// Comma-separated list of labels for error messages
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|tier| tier.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for NftTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NFT kind of a direct (non-distribution) reward grant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum NftRewardKind {
    #[sea_orm(string_value = "blackNFT")]
    #[serde(rename = "blackNFT")]
    Black,
    #[sea_orm(string_value = "greenNFT")]
    #[serde(rename = "greenNFT")]
    Green,
    #[sea_orm(string_value = "blueNFT")]
    #[serde(rename = "blueNFT")]
    Blue,
    #[sea_orm(string_value = "redNFT")]
    #[serde(rename = "redNFT")]
    Red,
    #[sea_orm(string_value = "flawlessNFT")]
    #[serde(rename = "flawlessNFT")]
    Flawless,
}

impl NftRewardKind {
    pub const ALL: [NftRewardKind; 5] = [
        NftRewardKind::Black,
        NftRewardKind::Green,
        NftRewardKind::Blue,
        NftRewardKind::Red,
        NftRewardKind::Flawless,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NftRewardKind::Black => "blackNFT",
            NftRewardKind::Green => "greenNFT",
            NftRewardKind::Blue => "blueNFT",
            NftRewardKind::Red => "redNFT",
            NftRewardKind::Flawless => "flawlessNFT",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(label))
    }
}
