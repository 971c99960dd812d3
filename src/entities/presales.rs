//! `SeaORM` Entity for diamond_token_store table (presale purchases)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "diamond_token_store")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub dit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub usdt_amount: Decimal,
    pub crypto_currency: String,
    pub purchase_date: DateTimeWithTimeZone,
    pub receiver_address: String,
    pub tokens_delivered: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
