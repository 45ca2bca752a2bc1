//! Migration: regions, news and the address to grid map.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MasterRegions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterRegions::RegionName)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MasterRegions::RegionType).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubRegions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubRegions::Index)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubRegions::MainRegion).string_len(32).not_null())
                    .col(ColumnDef::new(SubRegions::SubRegionName).string_len(32).not_null())
                    .col(ColumnDef::new(SubRegions::RegionType).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(News::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(News::Category).string_len(50).not_null())
                    .col(ColumnDef::new(News::Title).string_len(255).not_null())
                    .col(ColumnDef::new(News::Link).text().not_null().unique_key())
                    .col(ColumnDef::new(News::ImageUrl).text().null())
                    .col(ColumnDef::new(News::PubDate).date().not_null())
                    .col(
                        ColumnDef::new(News::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_news_pub_date_category")
                    .table(News::Table)
                    .col(News::PubDate)
                    .col(News::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LocationMaps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocationMaps::Address)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LocationMaps::XValue).integer().not_null())
                    .col(ColumnDef::new(LocationMaps::YValue).integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationMaps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubRegions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MasterRegions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MasterRegions {
    Table,
    RegionName,
    RegionType,
}

#[derive(Iden)]
enum SubRegions {
    Table,
    Index,
    MainRegion,
    SubRegionName,
    RegionType,
}

#[derive(Iden)]
enum News {
    Table,
    Id,
    Category,
    Title,
    Link,
    ImageUrl,
    PubDate,
    CreatedAt,
}

#[derive(Iden)]
enum LocationMaps {
    Table,
    Address,
    XValue,
    YValue,
}
