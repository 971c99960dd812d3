use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// CoinMarketCap supply payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyResponse {
    pub total_supply: Decimal,
    pub circulating_supply: Decimal,
    pub excluded_wallets_balance: Decimal,
    pub max_supply: Decimal,
}
