//! `SeaORM` Entity for user_reward_claim table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_reward_claim")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub wallet_address: String,
    #[sea_orm(column_type = "Decimal(Some((20, 6)))")]
    pub amount: Decimal,
    pub transaction_hash: String,
    pub log_index: i32,
    pub block_number: i64,
    pub claimed_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
