//! Favourite tours of a customer

use std::sync::Arc;

use tracing::info;

use crate::domain::favourite::FavouriteTour;
use crate::domain::tour::Tour;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct FavouriteService {
    repos: Arc<dyn RepositoryProvider>,
}

impl FavouriteService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn tour(&self, slug: &str) -> DomainResult<Tour> {
        self.repos
            .tours()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", "slug", slug))
    }

    /// Anonymous visitors and unknown slugs are simply not favourites
    pub async fn is_favourite(&self, customer_id: Option<i32>, slug: &str) -> DomainResult<bool> {
        let Some(customer_id) = customer_id else {
            return Ok(false);
        };
        let Some(tour) = self.repos.tours().find_by_slug(slug).await? else {
            return Ok(false);
        };
        self.repos.favourites().exists(customer_id, tour.id).await
    }

    /// Idempotent. Returns whether the favourite was newly created.
    pub async fn add(&self, customer_id: i32, slug: &str) -> DomainResult<bool> {
        let tour = self.tour(slug).await?;
        let created = self.repos.favourites().add(customer_id, tour.id).await?;
        if created {
            info!(customer_id, tour_id = tour.id, "Favourite added");
        }
        Ok(created)
    }

    /// Idempotent. Returns whether a favourite was removed.
    pub async fn remove(&self, customer_id: i32, slug: &str) -> DomainResult<bool> {
        let tour = self.tour(slug).await?;
        let removed = self.repos.favourites().remove(customer_id, tour.id).await?;
        if removed {
            info!(customer_id, tour_id = tour.id, "Favourite removed");
        }
        Ok(removed)
    }

    /// Flip the favourite and return the new state
    pub async fn toggle(&self, customer_id: i32, slug: &str) -> DomainResult<bool> {
        let tour = self.tour(slug).await?;
        if self.repos.favourites().remove(customer_id, tour.id).await? {
            return Ok(false);
        }
        self.repos.favourites().add(customer_id, tour.id).await?;
        Ok(true)
    }

    pub async fn clear(&self, customer_id: i32) -> DomainResult<u64> {
        let removed = self.repos.favourites().clear(customer_id).await?;
        info!(customer_id, removed, "Favourites cleared");
        Ok(removed)
    }

    pub async fn list(&self, customer_id: i32) -> DomainResult<Vec<FavouriteTour>> {
        self.repos.favourites().list(customer_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{Fixture, ALICE, BOB};

    #[tokio::test]
    async fn add_is_idempotent() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;
        let favourites = &fx.services.favourites;

        assert!(favourites.add(ALICE, &tour.slug).await.unwrap());
        assert!(favourites.is_favourite(Some(ALICE), &tour.slug).await.unwrap());
        assert!(!favourites.add(ALICE, &tour.slug).await.unwrap());
        assert!(favourites.is_favourite(Some(ALICE), &tour.slug).await.unwrap());
        assert_eq!(favourites.list(ALICE).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn anonymous_and_unknown_slug_are_not_favourites() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;
        fx.services.favourites.add(ALICE, &tour.slug).await.unwrap();

        assert!(!fx.services.favourites.is_favourite(None, &tour.slug).await.unwrap());
        assert!(!fx.services.favourites.is_favourite(None, "no-such-tour").await.unwrap());
        assert!(!fx
            .services
            .favourites
            .is_favourite(Some(ALICE), "no-such-tour")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn remove_is_a_no_op_when_absent() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;
        let favourites = &fx.services.favourites;

        assert!(!favourites.remove(ALICE, &tour.slug).await.unwrap());
        favourites.add(ALICE, &tour.slug).await.unwrap();
        assert!(favourites.remove(ALICE, &tour.slug).await.unwrap());
        assert!(!favourites.is_favourite(Some(ALICE), &tour.slug).await.unwrap());

        let err = favourites.remove(ALICE, "no-such-tour").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        let err = favourites.add(ALICE, "no-such-tour").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn toggle_and_clear() {
        let fx = Fixture::new().await;
        let a = fx.tour("Alpha Tour").await;
        let b = fx.tour("Beta Tour").await;
        let favourites = &fx.services.favourites;

        assert!(favourites.toggle(ALICE, &a.slug).await.unwrap());
        assert!(!favourites.toggle(ALICE, &a.slug).await.unwrap());
        favourites.add(ALICE, &a.slug).await.unwrap();
        favourites.add(ALICE, &b.slug).await.unwrap();
        favourites.add(BOB, &b.slug).await.unwrap();

        let listed: Vec<_> = favourites
            .list(ALICE)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.slug)
            .collect();
        assert_eq!(listed, vec![a.slug.clone(), b.slug.clone()]);

        assert_eq!(favourites.clear(ALICE).await.unwrap(), 2);
        assert!(favourites.list(ALICE).await.unwrap().is_empty());
        assert_eq!(favourites.list(BOB).await.unwrap().len(), 1);
    }
}
