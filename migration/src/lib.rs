pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_purchase_tables;
mod m20260101_000002_create_nft_reward;
mod m20260102_000001_create_reward_distribution;
mod m20260102_000002_create_pending_reward;
mod m20260102_000003_create_user_reward_claim;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_purchase_tables::Migration),
            Box::new(m20260101_000002_create_nft_reward::Migration),
            Box::new(m20260102_000001_create_reward_distribution::Migration),
            Box::new(m20260102_000002_create_pending_reward::Migration),
            Box::new(m20260102_000003_create_user_reward_claim::Migration),
        ]
    }
}
