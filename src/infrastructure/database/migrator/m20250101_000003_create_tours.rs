//! Create tours, tour_infos and tour_time_spans tables

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_catalog::{Companies, Countries};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tours::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tours::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Tours::CountryId).integer().not_null())
                    .col(ColumnDef::new(Tours::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Tours::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Tours::ImgPreviewUrl).string().not_null())
                    .col(ColumnDef::new(Tours::Price).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Tours::ShortDescription)
                            .string_len(120)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tours_company")
                            .from(Tours::Table, Tours::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tours_country")
                            .from(Tours::Table, Tours::CountryId)
                            .to(Countries::Table, Countries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourInfos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TourInfos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TourInfos::TourId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TourInfos::Description).text().not_null())
                    .col(ColumnDef::new(TourInfos::ImgUrl).string().not_null())
                    .col(ColumnDef::new(TourInfos::ImgBackgroundUrl).string().not_null())
                    .col(ColumnDef::new(TourInfos::Placed).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tour_infos_tour")
                            .from(TourInfos::Table, TourInfos::TourId)
                            .to(Tours::Table, Tours::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourTimeSpans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TourTimeSpans::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TourTimeSpans::TourId).integer().not_null())
                    .col(
                        ColumnDef::new(TourTimeSpans::GroupName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TourTimeSpans::DateFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TourTimeSpans::DateTo)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TourTimeSpans::PlaceCount)
                            .integer()
                            .not_null()
                            .check(Expr::col(TourTimeSpans::PlaceCount).gt(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tour_time_spans_tour")
                            .from(TourTimeSpans::Table, TourTimeSpans::TourId)
                            .to(Tours::Table, Tours::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Nearest departure lookup: tour_id, date_to DESC
        manager
            .create_index(
                Index::create()
                    .name("idx_tour_time_spans_tour_date_to")
                    .table(TourTimeSpans::Table)
                    .col(TourTimeSpans::TourId)
                    .col(TourTimeSpans::DateTo)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TourTimeSpans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourInfos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tours::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tours {
    Table,
    Id,
    CompanyId,
    CountryId,
    Title,
    Slug,
    ImgPreviewUrl,
    Price,
    ShortDescription,
}

#[derive(Iden)]
pub enum TourInfos {
    Table,
    Id,
    TourId,
    Description,
    ImgUrl,
    ImgBackgroundUrl,
    Placed,
}

#[derive(Iden)]
pub enum TourTimeSpans {
    Table,
    Id,
    TourId,
    GroupName,
    DateFrom,
    DateTo,
    PlaceCount,
}
