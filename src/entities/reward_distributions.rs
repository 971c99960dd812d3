//! `SeaORM` Entity for reward_distribution table
//!
//! One row per `RewardsDistributed` event (or per group of an admin bulk
//! distribution). `(transaction_hash, log_index)` is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NftTier;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reward_distribution")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nft_type: NftTier,
    #[sea_orm(column_type = "Decimal(Some((20, 6)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 6)))")]
    pub per_wallet_amount: Decimal,
    pub wallet_count: i32,
    pub transaction_hash: String,
    pub log_index: i32,
    pub block_number: i64,
    pub distributed_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pending_rewards::Entity")]
    PendingRewards,
}

impl Related<super::pending_rewards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PendingRewards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
