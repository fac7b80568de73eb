//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod catalog_repository;
pub mod favourite_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod status_catalog;
pub mod tour_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Unique violations become `Conflict`, everything else is a storage failure
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
        _ => DomainError::Storage(e.to_string()),
    }
}

/// For rows written on behalf of a customer: a foreign key failure means the
/// customer row does not exist.
pub(crate) fn customer_write_err(customer_id: i32) -> impl Fn(DbErr) -> DomainError {
    move |e| match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::not_found("Customer", "id", customer_id)
        }
        _ => db_err(e),
    }
}
