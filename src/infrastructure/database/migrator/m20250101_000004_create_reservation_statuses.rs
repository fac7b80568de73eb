//! Create and seed the reservation_statuses lookup table

use sea_orm_migration::prelude::*;

const STATUS_CODES: [&str; 7] = [
    "paid",
    "declined",
    "completed",
    "waiting",
    "moved",
    "paid_back",
    "no_show",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReservationStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationStatuses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReservationStatuses::Status)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert()
            .into_table(ReservationStatuses::Table)
            .columns([ReservationStatuses::Status])
            .to_owned();
        for code in STATUS_CODES {
            insert
                .values([code.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationStatuses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReservationStatuses {
    Table,
    Id,
    Status,
}
