//! Favourite tours of a customer

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::types::DomainResult;

/// A favourited tour as shown in the customer's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FavouriteTour {
    pub tour_id: i32,
    pub slug: String,
    pub title: String,
    pub price: Decimal,
    pub img_preview_url: String,
}

#[async_trait]
pub trait FavouriteRepository: Send + Sync {
    async fn exists(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool>;

    /// Insert the pair unless present. Returns whether a row was created.
    async fn add(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool>;

    /// Returns whether a row was removed
    async fn remove(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool>;

    /// Returns the number of rows removed
    async fn clear(&self, customer_id: i32) -> DomainResult<u64>;

    /// Favourites ordered by when they were added
    async fn list(&self, customer_id: i32) -> DomainResult<Vec<FavouriteTour>>;
}
