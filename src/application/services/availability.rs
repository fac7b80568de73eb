//! Read side: pending reservations, history, tour pages, popular tours

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::capacity::{CapacityAccountant, SpanAvailability};
use crate::domain::reservation::{Reservation, ReservationStatus, StatusPurpose};
use crate::domain::tour::{TourInfo, TourSummary};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::types::{PaginatedResult, PaginationParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Number of tours returned by `popular_tours` when no limit is given
pub const DEFAULT_POPULAR_LIMIT: u64 = 5;

#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub popular_limit: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            popular_limit: DEFAULT_POPULAR_LIMIT,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Everything the tour page shows
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TourFull {
    pub basic_info: TourSummary,
    pub detailed_info: Option<TourInfo>,
    /// Nearest departure, absent when the tour has none
    pub time_span: Option<SpanAvailability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusView {
    pub code: ReservationStatus,
    pub label: String,
}

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    accountant: Arc<CapacityAccountant>,
    limits: QueryLimits,
}

impl AvailabilityService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        accountant: Arc<CapacityAccountant>,
        limits: QueryLimits,
    ) -> Self {
        Self {
            repos,
            accountant,
            limits,
        }
    }

    fn page(&self, page: PaginationParams) -> PaginationParams {
        page.normalized(self.limits.default_page_size, self.limits.max_page_size)
    }

    // ── Customer reservations ───────────────────────────────────

    pub async fn list_pending(
        &self,
        customer_id: i32,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>> {
        self.repos
            .reservations()
            .list_for_customer(customer_id, Some(StatusPurpose::Pending.statuses()), self.page(page))
            .await
    }

    /// Same total as `list_pending` reports, computed live
    pub async fn count_pending(&self, customer_id: i32) -> DomainResult<u64> {
        self.repos
            .reservations()
            .count_for_customer(customer_id, Some(StatusPurpose::Pending.statuses()))
            .await
    }

    pub async fn history(
        &self,
        customer_id: i32,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>> {
        self.repos
            .reservations()
            .list_for_customer(customer_id, None, self.page(page))
            .await
    }

    // ── Tours ───────────────────────────────────────────────────

    pub async fn tour_full(&self, slug: &str) -> DomainResult<TourFull> {
        let basic_info = self
            .repos
            .tours()
            .find_summary_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", "slug", slug))?;
        let detailed_info = self.repos.tours().find_info(basic_info.id).await?;
        let time_span = match self.repos.tours().nearest_time_span(basic_info.id).await? {
            Some(span) => Some(self.accountant.availability(&span).await?),
            None => None,
        };
        Ok(TourFull {
            basic_info,
            detailed_info,
            time_span,
        })
    }

    pub async fn popular_tours(&self, limit: Option<u64>) -> DomainResult<Vec<TourSummary>> {
        let limit = limit.unwrap_or(self.limits.popular_limit);
        if limit == 0 {
            return Err(DomainError::validation("limit", "must be at least 1"));
        }
        self.repos
            .tours()
            .popular(limit.min(self.limits.max_page_size as u64))
            .await
    }

    pub fn list_statuses(&self) -> Vec<StatusView> {
        ReservationStatus::ALL
            .into_iter()
            .map(|code| StatusView {
                code,
                label: code.label().to_string(),
            })
            .collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{Fixture, ALICE, BOB};
    use crate::domain::tour::TourInfo;

    #[tokio::test]
    async fn pending_list_is_paginated_by_id_and_matches_count() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;
        fx.span(&tour, "June", 1, 10).await;

        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(fx.services.ledger.reserve(ALICE, &tour.slug, None).await.unwrap().id);
        }
        fx.services.ledger.reserve(BOB, &tour.slug, None).await.unwrap();
        fx.services.ledger.mark_paid(ALICE, &[ids[1]]).await.unwrap();

        let page = fx
            .services
            .availability
            .list_pending(ALICE, PaginationParams::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(
            page.items.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ids[3], ids[4]]
        );
        assert_eq!(fx.services.availability.count_pending(ALICE).await.unwrap(), 4);

        let history = fx
            .services
            .availability
            .history(ALICE, PaginationParams::new(1, 50))
            .await
            .unwrap();
        assert_eq!(history.total, 5);
    }

    #[tokio::test]
    async fn tour_full_reports_nearest_span_with_places_released() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;

        let bare = fx.services.availability.tour_full(&tour.slug).await.unwrap();
        assert!(bare.time_span.is_none());
        assert!(bare.detailed_info.is_none());
        assert_eq!(bare.basic_info.company_name, "Alpha Travel");
        assert_eq!(bare.basic_info.country_name, "Russia");

        fx.span(&tour, "June", 1, 10).await;
        let latest = fx.span(&tour, "July", 20, 8).await;
        let r = fx.services.ledger.reserve(ALICE, &tour.slug, Some(2)).await.unwrap();
        fx.services.ledger.mark_paid(ALICE, &[r.id]).await.unwrap();
        fx.services
            .catalog
            .set_tour_info(
                &tour.slug,
                TourInfo {
                    tour_id: 0,
                    description: "Long description".into(),
                    img_url: "https://img.example/a.jpg".into(),
                    img_background_url: "https://img.example/bg.jpg".into(),
                    placed: "Altai".into(),
                },
            )
            .await
            .unwrap();

        let full = fx.services.availability.tour_full(&tour.slug).await.unwrap();
        let span = full.time_span.unwrap();
        assert_eq!(span.id, latest.id);
        assert_eq!(span.places_released, 1);
        assert_eq!(span.places_left, 7);
        assert_eq!(full.detailed_info.unwrap().tour_id, tour.id);
    }

    #[tokio::test]
    async fn tour_full_unknown_slug_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx.services.availability.tour_full("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Tour", .. }));
    }

    #[tokio::test]
    async fn popular_tours_by_favourites_then_id() {
        let fx = Fixture::new().await;
        let a = fx.tour("Alpha").await;
        let b = fx.tour("Beta").await;
        let c = fx.tour("Gamma").await;
        fx.services.favourites.add(ALICE, &c.slug).await.unwrap();
        fx.services.favourites.add(BOB, &c.slug).await.unwrap();
        fx.services.favourites.add(ALICE, &b.slug).await.unwrap();

        let popular = fx.services.availability.popular_tours(None).await.unwrap();
        let order: Vec<_> = popular.iter().map(|t| (t.id, t.favourites_count)).collect();
        assert_eq!(order, vec![(c.id, 2), (b.id, 1), (a.id, 0)]);

        let top = fx.services.availability.popular_tours(Some(1)).await.unwrap();
        assert_eq!(top.len(), 1);
        assert!(fx.services.availability.popular_tours(Some(0)).await.is_err());
    }

    #[tokio::test]
    async fn statuses_are_listed_with_labels() {
        let fx = Fixture::new().await;
        let statuses = fx.services.availability.list_statuses();
        assert_eq!(statuses.len(), 7);
        assert!(statuses
            .iter()
            .any(|s| s.code == ReservationStatus::Waiting && s.label == "Ожидание оплаты"));
    }
}
