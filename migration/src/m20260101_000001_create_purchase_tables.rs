use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Presale purchases of DIT
        manager
            .create_table(
                Table::create()
                    .table(DiamondTokenStore::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiamondTokenStore::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DiamondTokenStore::DitAmount)
                            .decimal_len(20, 8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiamondTokenStore::UsdtAmount)
                            .decimal_len(20, 8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiamondTokenStore::CryptoCurrency)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiamondTokenStore::PurchaseDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DiamondTokenStore::ReceiverAddress)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiamondTokenStore::TokensDelivered)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Membership vouchers
        manager
            .create_table(
                Table::create()
                    .table(DioraMembership::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DioraMembership::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DioraMembership::UsdtAmount)
                            .decimal_len(20, 8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DioraMembership::CryptoCurrency)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DioraMembership::Email).string_len(254))
                    .col(ColumnDef::new(DioraMembership::Quantity).integer())
                    .col(
                        ColumnDef::new(DioraMembership::PurchaseDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DioraMembership::ReceiverAddress)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DioraMembership::MembershipAdded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Donations (dragon NFT campaign)
        manager
            .create_table(
                Table::create()
                    .table(Donation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donation::Amount).decimal_len(12, 6).not_null())
                    .col(
                        ColumnDef::new(Donation::UsdtAmount)
                            .decimal_len(12, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donation::ReceiverAddress)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donation::EmailAddress).string_len(254))
                    .col(
                        ColumnDef::new(Donation::PurchaseDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Donation::HasDragon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Donation::DragonDelivered)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DioraMembership::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiamondTokenStore::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DiamondTokenStore {
    Table,
    Id,
    DitAmount,
    UsdtAmount,
    CryptoCurrency,
    PurchaseDate,
    ReceiverAddress,
    TokensDelivered,
}

#[derive(DeriveIden)]
enum DioraMembership {
    Table,
    Id,
    UsdtAmount,
    CryptoCurrency,
    Email,
    Quantity,
    PurchaseDate,
    ReceiverAddress,
    MembershipAdded,
}

#[derive(DeriveIden)]
enum Donation {
    Table,
    Id,
    Amount,
    UsdtAmount,
    ReceiverAddress,
    EmailAddress,
    PurchaseDate,
    HasDragon,
    DragonDelivered,
}
