//! `SeaORM` Entity for nft_reward table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NftRewardKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "nft_reward")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub wallet_address: String,
    pub nft_type: NftRewardKind,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub dit_amount: Decimal,
    pub reward_collection_date: DateTimeWithTimeZone,
    pub reward_sent: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
