//! Presale, membership and donation request models

use rust_decimal::Decimal;
use serde::Deserialize;

use super::common::PageQuery;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePresaleRequest {
    pub dit_amount: Decimal,
    pub usdt_amount: Decimal,
    pub crypto_currency: String,
    pub receiver_address: String,
    #[serde(default)]
    pub tokens_delivered: bool,
}

impl CreatePresaleRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_purchase(&self.crypto_currency, &self.receiver_address, 255)?;
        if self.dit_amount <= Decimal::ZERO {
            return Err("dit_amount must be positive".to_string());
        }
        if self.usdt_amount < Decimal::ZERO {
            return Err("usdt_amount cannot be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresaleQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Substring match, case-insensitive
    pub receiver_address: Option<String>,
    pub crypto_currency: Option<String>,
    pub tokens_delivered: Option<bool>,
}

impl PresaleQuery {
    pub fn pagination(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMembershipRequest {
    pub usdt_amount: Decimal,
    pub crypto_currency: String,
    pub email: Option<String>,
    pub quantity: Option<i32>,
    pub receiver_address: String,
    #[serde(default)]
    pub membership_added: bool,
}

impl CreateMembershipRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_purchase(&self.crypto_currency, &self.receiver_address, 255)?;
        if self.usdt_amount < Decimal::ZERO {
            return Err("usdt_amount cannot be negative".to_string());
        }
        if let Some(quantity) = self.quantity {
            if quantity < 1 {
                return Err("quantity must be at least 1".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub receiver_address: Option<String>,
    pub crypto_currency: Option<String>,
    pub membership_added: Option<bool>,
}

impl MembershipQuery {
    pub fn pagination(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonationRequest {
    pub amount: Decimal,
    pub usdt_amount: Decimal,
    pub receiver_address: String,
    pub email_address: Option<String>,
    #[serde(default)]
    pub has_dragon: bool,
    #[serde(default)]
    pub dragon_delivered: bool,
}

impl CreateDonationRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.receiver_address.trim().is_empty() {
            return Err("receiver_address is required".to_string());
        }
        if self.receiver_address.len() > 50 {
            return Err("receiver_address cannot exceed 50 characters".to_string());
        }
        if self.amount <= Decimal::ZERO {
            return Err("amount must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DonationQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub receiver_address: Option<String>,
    pub has_dragon: Option<bool>,
    pub dragon_delivered: Option<bool>,
}

impl DonationQuery {
    pub fn pagination(&self) -> PageQuery {
        PageQuery::new(self.page, self.page_size)
    }
}

fn validate_purchase(currency: &str, receiver: &str, max_receiver: usize) -> Result<(), String> {
    if currency.trim().is_empty() {
        return Err("crypto_currency is required".to_string());
    }
    if currency.len() > 50 {
        return Err("crypto_currency cannot exceed 50 characters".to_string());
    }
    if receiver.trim().is_empty() {
        return Err("receiver_address is required".to_string());
    }
    if receiver.len() > max_receiver {
        return Err(format!(
            "receiver_address cannot exceed {} characters",
            max_receiver
        ));
    }
    Ok(())
}
