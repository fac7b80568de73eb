//! Tour repository interface (tours, details and time-spans)

use async_trait::async_trait;

use super::model::{NewTimeSpan, NewTour, Tour, TourInfo, TourSummary, TourTimeSpan};
use crate::shared::types::DomainResult;

#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tour>>;

    async fn find_summary_by_slug(&self, slug: &str) -> DomainResult<Option<TourSummary>>;

    async fn slug_exists(&self, slug: &str) -> DomainResult<bool>;

    /// Insert a tour under an already generated slug.
    /// A slug taken in the meantime fails with `Conflict`.
    async fn insert(&self, new: NewTour, slug: String) -> DomainResult<Tour>;

    async fn find_info(&self, tour_id: i32) -> DomainResult<Option<TourInfo>>;

    /// Create or replace the detail record of a tour
    async fn upsert_info(&self, info: TourInfo) -> DomainResult<TourInfo>;

    async fn add_time_span(&self, new: NewTimeSpan) -> DomainResult<TourTimeSpan>;

    async fn find_time_span(&self, id: i32) -> DomainResult<Option<TourTimeSpan>>;

    /// Latest-ending time-span of a tour, lowest id on ties
    async fn nearest_time_span(&self, tour_id: i32) -> DomainResult<Option<TourTimeSpan>>;

    /// Tours ordered by favourites count descending, then id ascending
    async fn popular(&self, limit: u64) -> DomainResult<Vec<TourSummary>>;
}
