use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NftReward::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NftReward::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NftReward::Email).string_len(254).not_null())
                    .col(
                        ColumnDef::new(NftReward::WalletAddress)
                            .string_len(80)
                            .not_null(),
                    )
                    .col(ColumnDef::new(NftReward::NftType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(NftReward::DitAmount)
                            .decimal_len(20, 8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NftReward::RewardCollectionDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(NftReward::RewardSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NftReward::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NftReward {
    Table,
    Id,
    Email,
    WalletAddress,
    NftType,
    DitAmount,
    RewardCollectionDate,
    RewardSent,
}
