//! Unified access to the per-aggregate repositories

use super::catalog::CatalogRepository;
use super::favourite::FavouriteRepository;
use super::reservation::ReservationRepository;
use super::tour::TourRepository;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let tour = repos.tours().find_by_slug("alpha-tour").await?;
///     let page = repos.reservations().list_for_customer(7, None, page).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn reservations(&self) -> &dyn ReservationRepository;
    fn tours(&self) -> &dyn TourRepository;
    fn favourites(&self) -> &dyn FavouriteRepository;
    fn catalog(&self) -> &dyn CatalogRepository;
}
