//! `SeaORM` Entity for diora_membership table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "diora_membership")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub usdt_amount: Decimal,
    pub crypto_currency: String,
    pub email: Option<String>,
    pub quantity: Option<i32>,
    pub purchase_date: DateTimeWithTimeZone,
    pub receiver_address: String,
    pub membership_added: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
