//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_customers;
mod m20250101_000002_create_catalog;
mod m20250101_000003_create_tours;
mod m20250101_000004_create_reservation_statuses;
mod m20250101_000005_create_reservations;
mod m20250101_000006_create_favourites;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_customers::Migration),
            Box::new(m20250101_000002_create_catalog::Migration),
            Box::new(m20250101_000003_create_tours::Migration),
            Box::new(m20250101_000004_create_reservation_statuses::Migration),
            Box::new(m20250101_000005_create_reservations::Migration),
            Box::new(m20250101_000006_create_favourites::Migration),
        ]
    }
}
