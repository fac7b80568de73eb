//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{CapacityPolicy, NewReservation, Occupancy, Reservation, StatusUpdateOutcome};
use super::status::{ReservationStatus, StatusTransition};
use crate::shared::types::{DomainResult, PaginatedResult, PaginationParams};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation in `waiting`. When `policy` enforces capacity the
    /// time-span is locked and the check runs in the same transaction.
    async fn insert(&self, new: NewReservation, policy: CapacityPolicy) -> DomainResult<Reservation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Change the seat count of a reservation owned by `owner`.
    /// Returns `None` when it does not exist or belongs to someone else.
    async fn update_count(
        &self,
        id: i32,
        owner: i32,
        count: i32,
        policy: CapacityPolicy,
    ) -> DomainResult<Option<Reservation>>;

    /// Delete a reservation owned by `owner`. Returns whether a row was removed.
    async fn delete_owned(&self, id: i32, owner: i32) -> DomainResult<bool>;

    /// Apply `transition` to `ids` in one transaction, optionally restricted
    /// to reservations of `owner`.
    async fn transition_status(
        &self,
        ids: &[i32],
        owner: Option<i32>,
        transition: StatusTransition,
    ) -> DomainResult<StatusUpdateOutcome>;

    /// Customer's reservations ordered by id. `statuses = None` means all.
    async fn list_for_customer(
        &self,
        customer_id: i32,
        statuses: Option<&[ReservationStatus]>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>>;

    async fn count_for_customer(
        &self,
        customer_id: i32,
        statuses: Option<&[ReservationStatus]>,
    ) -> DomainResult<u64>;

    /// Reservations and seats on a time-span within `statuses`
    async fn occupancy(
        &self,
        time_span_id: i32,
        statuses: &[ReservationStatus],
    ) -> DomainResult<Occupancy>;

    /// Ids of reservations in `statuses` whose time-span ended before `now`
    async fn find_ids_departed_before(
        &self,
        now: DateTime<Utc>,
        statuses: &[ReservationStatus],
    ) -> DomainResult<Vec<i32>>;
}
