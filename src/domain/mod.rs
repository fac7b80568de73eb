pub mod catalog;
pub mod favourite;
pub mod repositories;
pub mod reservation;
pub mod tour;

pub use crate::shared::types::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
