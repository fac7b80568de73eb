//! Create reservations table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_customers::Customers;
use super::m20250101_000003_create_tours::TourTimeSpans;
use super::m20250101_000004_create_reservation_statuses::ReservationStatuses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Reservations::TimeSpanId).integer().not_null())
                    .col(ColumnDef::new(Reservations::StatusId).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::Count)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Reservations::Count).gte(1)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_customer")
                            .from(Reservations::Table, Reservations::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_time_span")
                            .from(Reservations::Table, Reservations::TimeSpanId)
                            .to(TourTimeSpans::Table, TourTimeSpans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_status")
                            .from(Reservations::Table, Reservations::StatusId)
                            .to(ReservationStatuses::Table, ReservationStatuses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_customer_status")
                    .table(Reservations::Table)
                    .col(Reservations::CustomerId)
                    .col(Reservations::StatusId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_time_span_status")
                    .table(Reservations::Table)
                    .col(Reservations::TimeSpanId)
                    .col(Reservations::StatusId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    CustomerId,
    TimeSpanId,
    StatusId,
    Count,
}
