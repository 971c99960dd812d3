use rust_decimal::Decimal;
use serde::Deserialize;

use super::common::PageQuery;
use crate::entities::sea_orm_active_enums::NftRewardKind;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNftRewardRequest {
    pub email: String,
    pub wallet_address: String,
    pub nft_type: NftRewardKind,
    pub dit_amount: Decimal,
    #[serde(default)]
    pub reward_sent: bool,
}

impl CreateNftRewardRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("email is not valid".to_string());
        }
        if self.wallet_address.trim().is_empty() {
            return Err("wallet_address is required".to_string());
        }
        if self.wallet_address.len() > 80 {
            return Err("wallet_address cannot exceed 80 characters".to_string());
        }
        if self.dit_amount <= Decimal::ZERO {
            return Err("dit_amount must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftRewardQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// One of blackNFT, greenNFT, blueNFT, redNFT, flawlessNFT
    pub nft_type: Option<String>,
    /// Substring match, case-insensitive
    pub wallet_address: Option<String>,
    pub reward_sent: Option<bool>,
}

impl NftRewardQuery {
    pub fn pagination(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }

    pub fn nft_kind(&self) -> Result<Option<NftRewardKind>, String> {
        match self.nft_type.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => NftRewardKind::parse(raw)
                .map(Some)
                .ok_or_else(|| format!("Invalid nft_type: {}", raw)),
        }
    }
}
