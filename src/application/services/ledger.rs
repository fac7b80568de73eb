//! Reservation ledger: every mutation of reservations goes through here
//!
//! Each operation maps to one atomic repository call. Ownership mismatches
//! are reported as `NotFound`, never as a permission error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{info, warn};

use crate::domain::reservation::{
    validate_count, CapacityPolicy, NewReservation, Reservation, ReservationStatus,
    StatusPurpose, StatusTransition, StatusUpdateOutcome,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct ReservationLedger {
    repos: Arc<dyn RepositoryProvider>,
    policy: CapacityPolicy,
}

impl ReservationLedger {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: CapacityPolicy) -> Self {
        Self { repos, policy }
    }

    // ── Customer operations ─────────────────────────────────────

    /// Reserve `count` seats (default 1) on the nearest departure of the tour.
    pub async fn reserve(
        &self,
        customer_id: i32,
        tour_slug: &str,
        count: Option<i32>,
    ) -> DomainResult<Reservation> {
        let count = count.unwrap_or(1);
        validate_count(count)?;

        let tour = self
            .repos
            .tours()
            .find_by_slug(tour_slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", "slug", tour_slug))?;
        let span = self
            .repos
            .tours()
            .nearest_time_span(tour.id)
            .await?
            .ok_or_else(|| DomainError::not_found("TourTimeSpan", "tour", tour_slug))?;

        let new = NewReservation {
            customer_id,
            time_span_id: span.id,
            count,
        };
        let reservation = self
            .repos
            .reservations()
            .insert(new, self.policy)
            .await
            .inspect_err(|e| self.note_rejection(e))?;

        counter!("tourbook_reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            customer_id,
            time_span_id = span.id,
            count,
            "Reservation created"
        );
        Ok(reservation)
    }

    pub async fn update_count(
        &self,
        reservation_id: i32,
        customer_id: i32,
        count: i32,
    ) -> DomainResult<Reservation> {
        validate_count(count)?;
        let reservation = self
            .repos
            .reservations()
            .update_count(reservation_id, customer_id, count, self.policy)
            .await
            .inspect_err(|e| self.note_rejection(e))?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", reservation_id))?;

        info!(reservation_id, customer_id, count, "Reservation count updated");
        Ok(reservation)
    }

    pub async fn delete(&self, reservation_id: i32, customer_id: i32) -> DomainResult<()> {
        let removed = self
            .repos
            .reservations()
            .delete_owned(reservation_id, customer_id)
            .await?;
        if !removed {
            return Err(DomainError::not_found("Reservation", "id", reservation_id));
        }

        counter!("tourbook_reservations_deleted_total").increment(1);
        info!(reservation_id, customer_id, "Reservation deleted");
        Ok(())
    }

    /// Pay for the customer's pending reservations among `ids`
    pub async fn mark_paid(&self, customer_id: i32, ids: &[i32]) -> DomainResult<StatusUpdateOutcome> {
        if ids.is_empty() {
            return Err(DomainError::validation("ids", "must not be empty"));
        }
        let outcome = self
            .repos
            .reservations()
            .transition_status(ids, Some(customer_id), StatusTransition::mark_paid())
            .await?;
        self.record(&outcome, ReservationStatus::Paid);
        info!(
            customer_id,
            updated = outcome.updated.len(),
            unchanged = outcome.unchanged.len(),
            unmatched = outcome.unmatched.len(),
            "Reservations marked paid"
        );
        Ok(outcome)
    }

    // ── Operator operations ─────────────────────────────────────

    /// Move reservations to `target`, regardless of owner, where the
    /// transition table allows it.
    pub async fn apply_status(
        &self,
        ids: &[i32],
        target: ReservationStatus,
    ) -> DomainResult<StatusUpdateOutcome> {
        if ids.is_empty() {
            return Err(DomainError::validation("ids", "must not be empty"));
        }
        let outcome = self
            .repos
            .reservations()
            .transition_status(ids, None, StatusTransition::into_status(target))
            .await?;
        self.record(&outcome, target);
        info!(
            status = %target,
            updated = outcome.updated.len(),
            unmatched = outcome.unmatched.len(),
            "Reservation status applied"
        );
        Ok(outcome)
    }

    /// Complete paid reservations whose departure ended before `now`.
    /// Running it again for the same `now` changes nothing.
    pub async fn complete_departed(&self, now: DateTime<Utc>) -> DomainResult<StatusUpdateOutcome> {
        let ids = self
            .repos
            .reservations()
            .find_ids_departed_before(now, StatusPurpose::Occupying.statuses())
            .await?;
        if ids.is_empty() {
            return Ok(StatusUpdateOutcome::default());
        }
        let outcome = self
            .repos
            .reservations()
            .transition_status(&ids, None, StatusTransition::complete_departed())
            .await?;
        self.record(&outcome, ReservationStatus::Completed);
        info!(completed = outcome.updated.len(), "Departed reservations completed");
        Ok(outcome)
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn record(&self, outcome: &StatusUpdateOutcome, to: ReservationStatus) {
        if !outcome.updated.is_empty() {
            counter!("tourbook_reservation_status_updates_total", "to" => to.as_str())
                .increment(outcome.updated.len() as u64);
        }
    }

    fn note_rejection(&self, err: &DomainError) {
        if let DomainError::Conflict(reason) = err {
            counter!("tourbook_capacity_rejections_total").increment(1);
            warn!(reason = %reason, "Reservation rejected");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
