use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserRewardClaim::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserRewardClaim::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::WalletAddress)
                            .string_len(42)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::Amount)
                            .decimal_len(20, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::TransactionHash)
                            .string_len(66)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::LogIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::BlockNumber)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::ClaimedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRewardClaim::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_reward_claim_tx_log_unique")
                    .table(UserRewardClaim::Table)
                    .col(UserRewardClaim::TransactionHash)
                    .col(UserRewardClaim::LogIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_reward_claim_wallet_claimed_at")
                    .table(UserRewardClaim::Table)
                    .col(UserRewardClaim::WalletAddress)
                    .col(UserRewardClaim::ClaimedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRewardClaim::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserRewardClaim {
    Table,
    Id,
    WalletAddress,
    Amount,
    TransactionHash,
    LogIndex,
    BlockNumber,
    ClaimedAt,
    CreatedAt,
}
