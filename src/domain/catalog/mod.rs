//! Companies and countries that tours belong to

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::types::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl NewCompany {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be blank"));
        }
        let digits = self.phone.strip_prefix('+').unwrap_or(&self.phone);
        if !(9..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "phone",
                "expected 9 to 15 digits with an optional leading '+'",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Country {
    pub id: i32,
    pub name: String,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn company_slug_exists(&self, slug: &str) -> DomainResult<bool>;

    /// Insert a company under an already generated slug. Duplicate names or
    /// slugs fail with `Conflict`.
    async fn insert_company(&self, new: NewCompany, slug: String) -> DomainResult<Company>;

    async fn find_company(&self, id: i32) -> DomainResult<Option<Company>>;

    /// Duplicate names fail with `Conflict`
    async fn insert_country(&self, name: String) -> DomainResult<Country>;

    async fn find_country(&self, id: i32) -> DomainResult<Option<Country>>;
}
