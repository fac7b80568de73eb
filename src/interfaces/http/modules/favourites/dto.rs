//! Favourite DTOs

use serde::Serialize;
use utoipa::ToSchema;

/// Whether the tour is in the customer's favourites after the call
#[derive(Debug, Serialize, ToSchema)]
pub struct FavouriteStatusResponse {
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearFavouritesResponse {
    /// Number of favourites removed
    pub removed: u64,
}
