//! Capacity accounting: how many places of a time-span are released

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::reservation::{OccupancyRule, StatusPurpose};
use crate::domain::tour::TourTimeSpan;
use crate::domain::{DomainResult, RepositoryProvider};

/// A time-span together with its current occupancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SpanAvailability {
    pub id: i32,
    pub group_name: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub place_count: i32,
    pub places_released: i64,
    pub places_left: i64,
}

pub struct CapacityAccountant {
    repos: Arc<dyn RepositoryProvider>,
    rule: OccupancyRule,
}

impl CapacityAccountant {
    pub fn new(repos: Arc<dyn RepositoryProvider>, rule: OccupancyRule) -> Self {
        Self { repos, rule }
    }

    pub fn rule(&self) -> OccupancyRule {
        self.rule
    }

    /// Places taken on `time_span_id` by seat-occupying reservations.
    /// Read-only; an unknown time-span has nothing released.
    pub async fn places_released(&self, time_span_id: i32) -> DomainResult<i64> {
        let occupancy = self
            .repos
            .reservations()
            .occupancy(time_span_id, StatusPurpose::Occupying.statuses())
            .await?;
        Ok(self.rule.places(occupancy))
    }

    pub async fn availability(&self, span: &TourTimeSpan) -> DomainResult<SpanAvailability> {
        let places_released = self.places_released(span.id).await?;
        Ok(SpanAvailability {
            id: span.id,
            group_name: span.group_name.clone(),
            date_from: span.date_from,
            date_to: span.date_to,
            place_count: span.place_count,
            places_released,
            places_left: (span.place_count as i64 - places_released).max(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::application::services::test_support::{Fixture, ALICE};
    use crate::domain::reservation::ReservationStatus;

    #[tokio::test]
    async fn zero_when_nothing_is_paid() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;
        let span = fx.span(&tour, "June", 1, 10).await;
        fx.services.ledger.reserve(ALICE, &tour.slug, Some(4)).await.unwrap();

        assert_eq!(fx.services.accountant.places_released(span.id).await.unwrap(), 0);
        assert_eq!(fx.services.accountant.places_released(12_345).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn availability_reports_places_left() {
        let fx = Fixture::new().await;
        let tour = fx.tour("Alpha Tour").await;
        let span = fx.span(&tour, "June", 1, 2).await;
        let r = fx.services.ledger.reserve(ALICE, &tour.slug, None).await.unwrap();
        fx.services
            .ledger
            .apply_status(&[r.id], ReservationStatus::Paid)
            .await
            .unwrap();

        let availability = fx.services.accountant.availability(&span).await.unwrap();
        assert_eq!(availability.places_released, 1);
        assert_eq!(availability.places_left, 1);
        assert_eq!(availability.place_count, 2);
    }
}
