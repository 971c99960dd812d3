//! `SeaORM` Entity for pending_reward table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NftTier;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_reward")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub wallet_address: String,
    pub nft_type: NftTier,
    #[sea_orm(column_type = "Decimal(Some((20, 6)))")]
    pub dit_amount: Decimal,
    pub distribution_id: i32,
    pub is_sent: bool,
    pub sent_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reward_distributions::Entity",
        from = "Column::DistributionId",
        to = "super::reward_distributions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    RewardDistribution,
}

impl Related<super::reward_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RewardDistribution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
