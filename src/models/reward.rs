//! Reward distribution, pending reward and claim models

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::PageQuery;
use crate::entities::{sea_orm_active_enums::NftTier, user_reward_claims};

/// Parse an optional tier filter, treating empty as absent
pub fn parse_tier_filter(raw: Option<&str>) -> Result<Option<NftTier>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => NftTier::parse(label).map(Some).ok_or_else(|| {
            format!("Invalid nft_type. Must be one of: {}", NftTier::choices())
        }),
    }
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DistributionQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub nft_type: Option<String>,
}

impl DistributionQuery {
    pub fn pagination(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}

/// One tier entry inside a transaction group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub id: i32,
    pub nft_type: NftTier,
    pub total_amount: Decimal,
    pub per_wallet_amount: Decimal,
    pub wallet_count: i32,
    pub log_index: i32,
}

/// All distributions that share a transaction hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionGroup {
    pub transaction_hash: String,
    pub block_number: i64,
    pub distributed_at: DateTime<FixedOffset>,
    pub distributions: Vec<DistributionEntry>,
    pub total_amount_all_types: Decimal,
    pub total_wallets_all_types: i64,
    pub total_distributions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDistributionRequest {
    pub nft_type: NftTier,
    pub total_amount: Decimal,
    pub per_wallet_amount: Decimal,
    pub wallet_count: i32,
    pub transaction_hash: String,
    #[serde(default)]
    pub log_index: i32,
    pub block_number: i64,
    pub distributed_at: Option<DateTime<FixedOffset>>,
}

impl CreateDistributionRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_tx_hash(&self.transaction_hash)?;
        if self.total_amount < Decimal::ZERO || self.per_wallet_amount < Decimal::ZERO {
            return Err("amounts cannot be negative".to_string());
        }
        if self.wallet_count < 0 {
            return Err("wallet_count cannot be negative".to_string());
        }
        if self.log_index < 0 || self.block_number < 0 {
            return Err("log_index and block_number cannot be negative".to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bulk distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDistributionGroup {
    pub nft_type: NftTier,
    pub eligible_wallets: Vec<String>,
    pub total_dit_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDistributeRequest {
    pub distributions: Vec<BulkDistributionGroup>,
    pub transaction_hash: Option<String>,
    pub block_number: Option<i64>,
}

impl BulkDistributeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.distributions.is_empty() {
            return Err("distributions cannot be empty".to_string());
        }
        if let Some(hash) = self.transaction_hash.as_deref() {
            if !hash.is_empty() {
                validate_tx_hash(hash)?;
            }
        }
        if matches!(self.block_number, Some(n) if n < 0) {
            return Err("block_number cannot be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDistributionResult {
    pub distribution_id: i32,
    pub nft_type: NftTier,
    pub total_dit_amount: Decimal,
    pub per_wallet_amount: Decimal,
    pub wallet_count: i32,
    pub pending_rewards_created: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDistributeResponse {
    pub message: String,
    pub total_distributions: usize,
    pub total_wallets: usize,
    pub total_dit_distributed: Decimal,
    pub distributions: Vec<BulkDistributionResult>,
}

// ---------------------------------------------------------------------------
// Pending rewards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PendingRewardQuery {
    /// Exact match, case-insensitive
    pub wallet_address: Option<String>,
    pub nft_type: Option<String>,
    pub is_sent: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTierSummary {
    pub nft_type: NftTier,
    pub total_amount: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRewardSummary {
    pub rewards_by_nft_type: Vec<PendingTierSummary>,
    pub total_pending_rewards: Decimal,
    pub total_pending_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkSentRequest {
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkSentResponse {
    pub updated: u64,
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Substring match, case-insensitive
    pub wallet_address: Option<String>,
}

impl ClaimQuery {
    pub fn pagination(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClaimRequest {
    pub wallet_address: String,
    pub amount: Decimal,
    pub transaction_hash: String,
    #[serde(default)]
    pub log_index: i32,
    pub block_number: i64,
    pub claimed_at: Option<DateTime<FixedOffset>>,
}

impl CreateClaimRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_tx_hash(&self.transaction_hash)?;
        if self.wallet_address.trim().is_empty() || self.wallet_address.len() > 42 {
            return Err("wallet_address must be at most 42 characters".to_string());
        }
        if self.amount < Decimal::ZERO {
            return Err("amount cannot be negative".to_string());
        }
        if self.log_index < 0 || self.block_number < 0 {
            return Err("log_index and block_number cannot be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletClaimsResponse {
    pub wallet_address: String,
    pub total_claimed: Decimal,
    pub total_claims_count: usize,
    pub claims: Vec<user_reward_claims::Model>,
}

fn validate_tx_hash(hash: &str) -> Result<(), String> {
    if hash.trim().is_empty() {
        return Err("transaction_hash is required".to_string());
    }
    if hash.len() > 66 {
        return Err("transaction_hash cannot exceed 66 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tier_filter() {
        assert_eq!(parse_tier_filter(None).unwrap(), None);
        assert_eq!(parse_tier_filter(Some("")).unwrap(), None);
        assert_eq!(parse_tier_filter(Some("black")).unwrap(), Some(NftTier::Black));
        let err = parse_tier_filter(Some("gold")).unwrap_err();
        assert!(err.starts_with("Invalid nft_type. Must be one of: RED"));
    }

    #[test]
    fn test_bulk_request_deserializes() {
        let req: BulkDistributeRequest = serde_json::from_str(
            r#"{
                "distributions": [
                    {"nft_type": "RED", "eligible_wallets": ["0xabc"], "total_dit_amount": "100"}
                ],
                "transaction_hash": "0xfeed"
            }"#,
        )
        .unwrap();
        assert_eq!(req.distributions.len(), 1);
        assert_eq!(req.distributions[0].nft_type, NftTier::Red);
        assert_eq!(req.block_number, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_bulk_request_requires_groups() {
        let req = BulkDistributeRequest {
            distributions: vec![],
            transaction_hash: None,
            block_number: None,
        };
        assert_eq!(req.validate().unwrap_err(), "distributions cannot be empty");
    }

    #[test]
    fn test_claim_request_rejects_long_hash() {
        let req = CreateClaimRequest {
            wallet_address: "0xabc".to_string(),
            amount: Decimal::ONE,
            transaction_hash: format!("0x{}", "a".repeat(70)),
            log_index: 0,
            block_number: 1,
            claimed_at: None,
        };
        assert!(req.validate().is_err());
    }
}
