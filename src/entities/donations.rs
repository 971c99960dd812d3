//! `SeaORM` Entity for donation table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 6)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 6)))")]
    pub usdt_amount: Decimal,
    pub receiver_address: String,
    pub email_address: Option<String>,
    pub purchase_date: DateTimeWithTimeZone,
    pub has_dragon: bool,
    pub dragon_delivered: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
