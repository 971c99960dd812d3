use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RewardDistribution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardDistribution::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::NftType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::TotalAmount)
                            .decimal_len(20, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::PerWalletAmount)
                            .decimal_len(20, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::WalletCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::TransactionHash)
                            .string_len(66)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::LogIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::BlockNumber)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::DistributedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RewardDistribution::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Idempotency key for on-chain events
        manager
            .create_index(
                Index::create()
                    .name("idx_reward_distribution_tx_log_unique")
                    .table(RewardDistribution::Table)
                    .col(RewardDistribution::TransactionHash)
                    .col(RewardDistribution::LogIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reward_distribution_distributed_at_type")
                    .table(RewardDistribution::Table)
                    .col(RewardDistribution::DistributedAt)
                    .col(RewardDistribution::NftType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reward_distribution_block_number")
                    .table(RewardDistribution::Table)
                    .col(RewardDistribution::BlockNumber)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RewardDistribution::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum RewardDistribution {
    Table,
    Id,
    NftType,
    TotalAmount,
    PerWalletAmount,
    WalletCount,
    TransactionHash,
    LogIndex,
    BlockNumber,
    DistributedAt,
    CreatedAt,
}
