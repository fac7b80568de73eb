//! SeaORM implementation of RepositoryProvider

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::catalog::CatalogRepository;
use crate::domain::favourite::FavouriteRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::tour::TourRepository;

use super::catalog_repository::SeaOrmCatalogRepository;
use super::favourite_repository::SeaOrmFavouriteRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::status_catalog::StatusCatalog;
use super::tour_repository::SeaOrmTourRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let tour = repos.tours().find_by_slug("alpha-tour").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    reservations: SeaOrmReservationRepository,
    tours: SeaOrmTourRepository,
    favourites: SeaOrmFavouriteRepository,
    catalog: SeaOrmCatalogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        let statuses = Arc::new(StatusCatalog::new(db.clone()));
        Self {
            reservations: SeaOrmReservationRepository::new(db.clone(), statuses),
            tours: SeaOrmTourRepository::new(db.clone()),
            favourites: SeaOrmFavouriteRepository::new(db.clone()),
            catalog: SeaOrmCatalogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn tours(&self) -> &dyn TourRepository {
        &self.tours
    }

    fn favourites(&self) -> &dyn FavouriteRepository {
        &self.favourites
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        &self.catalog
    }
}
