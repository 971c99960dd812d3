//! Reward analytics request/response models
//!
//! Windowed responses carry the current window, the equal-length window that
//! precedes it, and the percentage change per metric. Without a `period` the
//! endpoints return all-time totals only.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// week | month | 6months | year | custom
    pub period: Option<String>,
    /// YYYY-MM-DD, custom period only
    pub start_date: Option<String>,
    /// YYYY-MM-DD, custom period only
    pub end_date: Option<String>,
    pub nft_type: Option<String>,
    pub wallet_address: Option<String>,
}

/// Aggregates over a set of distributions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardMetrics {
    pub total_distributed: Decimal,
    pub total_distributions: u64,
    pub total_wallets_rewarded: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChanges {
    pub total_distributed: f64,
    pub total_distributions: f64,
    pub total_wallets_rewarded: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedMetrics {
    pub current_period: RewardMetrics,
    pub previous_period: RewardMetrics,
    pub percentage_change: MetricChanges,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RewardTotals {
    AllTime(RewardMetrics),
    Windowed(WindowedMetrics),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodInfo {
    pub period: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalRewardsResponse {
    #[serde(flatten)]
    pub window: Option<PeriodInfo>,
    #[serde(flatten)]
    pub totals: RewardTotals,
}

/// A wallet's share of one distribution transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRewardEntry {
    pub transaction_hash: String,
    pub distributed_at: DateTime<FixedOffset>,
    pub per_wallet_amount: Decimal,
    pub user_reward: Decimal,
    pub is_sent: bool,
    pub block_number: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletRewardBreakdown {
    pub wallet_address: String,
    pub wallet_rewards: Vec<WalletRewardEntry>,
    pub total_user_rewards: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct NftTypeRewardsResponse {
    pub nft_type: String,
    #[serde(flatten)]
    pub window: Option<PeriodInfo>,
    #[serde(flatten)]
    pub totals: RewardTotals,
    #[serde(flatten)]
    pub wallet: Option<WalletRewardBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllNftTypesResponse {
    #[serde(flatten)]
    pub window: Option<PeriodInfo>,
    pub nft_types: BTreeMap<String, RewardTotals>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn metrics(total: Decimal, count: u64, wallets: i64) -> RewardMetrics {
        RewardMetrics {
            total_distributed: total,
            total_distributions: count,
            total_wallets_rewarded: wallets,
        }
    }

    #[test]
    fn test_all_time_response_is_flat() {
        let response = TotalRewardsResponse {
            window: None,
            totals: RewardTotals::AllTime(metrics(dec!(500), 3, 40)),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "total_distributed": "500",
                "total_distributions": 3,
                "total_wallets_rewarded": 40
            })
        );
    }

    #[test]
    fn test_windowed_response_shape() {
        let response = TotalRewardsResponse {
            window: Some(PeriodInfo {
                period: "week".to_string(),
                start_date: "2026-01-01".to_string(),
                end_date: "2026-01-08".to_string(),
            }),
            totals: RewardTotals::Windowed(WindowedMetrics {
                current_period: metrics(dec!(100), 2, 20),
                previous_period: metrics(dec!(80), 1, 10),
                percentage_change: MetricChanges {
                    total_distributed: 25.0,
                    total_distributions: 100.0,
                    total_wallets_rewarded: 100.0,
                },
            }),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["period"], "week");
        assert_eq!(value["current_period"]["total_distributions"], 2);
        assert_eq!(value["percentage_change"]["total_distributed"], 25.0);
        assert!(value.get("total_distributed").is_none());
    }

    #[test]
    fn test_nft_type_response_without_wallet() {
        let response = NftTypeRewardsResponse {
            nft_type: "RED".to_string(),
            window: None,
            totals: RewardTotals::AllTime(RewardMetrics::default()),
            wallet: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["nft_type"], "RED");
        assert!(value.get("wallet_rewards").is_none());
    }
}
