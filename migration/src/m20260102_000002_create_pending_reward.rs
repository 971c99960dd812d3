use sea_orm_migration::prelude::*;

use crate::m20260102_000001_create_reward_distribution::RewardDistribution;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingReward::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingReward::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingReward::WalletAddress)
                            .string_len(42)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingReward::NftType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingReward::DitAmount)
                            .decimal_len(20, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingReward::DistributionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingReward::IsSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PendingReward::SentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PendingReward::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pending_reward_distribution_id")
                            .from(PendingReward::Table, PendingReward::DistributionId)
                            .to(RewardDistribution::Table, RewardDistribution::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pending_reward_wallet_type")
                    .table(PendingReward::Table)
                    .col(PendingReward::WalletAddress)
                    .col(PendingReward::NftType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingReward::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PendingReward {
    Table,
    Id,
    WalletAddress,
    NftType,
    DitAmount,
    DistributionId,
    IsSent,
    SentAt,
    CreatedAt,
}
