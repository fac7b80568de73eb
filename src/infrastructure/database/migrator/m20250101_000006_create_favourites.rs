//! Create favourites table with a unique (customer_id, tour_id) pair

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_customers::Customers;
use super::m20250101_000003_create_tours::Tours;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favourites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favourites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favourites::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Favourites::TourId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favourites_customer")
                            .from(Favourites::Table, Favourites::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favourites_tour")
                            .from(Favourites::Table, Favourites::TourId)
                            .to(Tours::Table, Tours::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favourites_customer_tour")
                    .table(Favourites::Table)
                    .col(Favourites::CustomerId)
                    .col(Favourites::TourId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favourites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Favourites {
    Table,
    Id,
    CustomerId,
    TourId,
}
