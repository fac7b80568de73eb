//! Reservation domain entity and capacity accounting types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::status::{ReservationStatus, StatusTransition};
use crate::shared::types::{DomainError, DomainResult};

/// A customer's booking on one time-span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub customer_id: i32,
    /// Fixed at creation
    pub time_span_id: i32,
    pub status: ReservationStatus,
    /// Number of seats, always >= 1
    pub count: i32,
}

impl Reservation {
    pub fn is_owned_by(&self, customer_id: i32) -> bool {
        self.customer_id == customer_id
    }
}

/// Data for a reservation that is about to be inserted in `waiting`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReservation {
    pub customer_id: i32,
    pub time_span_id: i32,
    pub count: i32,
}

pub fn validate_count(count: i32) -> DomainResult<()> {
    if count < 1 {
        return Err(DomainError::validation(
            "count",
            format!("must be at least 1, got {}", count),
        ));
    }
    Ok(())
}

// ── Occupancy ──────────────────────────────────────────────────

/// Aggregate of the reservations on a time-span that fall in some status set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub reservations: i64,
    pub seats: i64,
}

impl Occupancy {
    pub fn new(reservations: i64, seats: i64) -> Self {
        Self {
            reservations,
            seats,
        }
    }

    /// Occupancy after adding one reservation of `count` seats
    pub fn with_reservation(self, count: i32) -> Self {
        Self {
            reservations: self.reservations + 1,
            seats: self.seats + count as i64,
        }
    }
}

/// How occupancy turns into a number of released places
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyRule {
    /// One place per reservation, whatever its seat count
    #[default]
    ReservationCount,
    /// Sum of reserved seats
    SeatSum,
}

impl OccupancyRule {
    pub const BASELINE: OccupancyRule = OccupancyRule::ReservationCount;

    pub fn places(&self, occupancy: Occupancy) -> i64 {
        match self {
            Self::ReservationCount => occupancy.reservations,
            Self::SeatSum => occupancy.seats,
        }
    }
}

/// Booking-time capacity check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityPolicy {
    pub enforce: bool,
    pub rule: OccupancyRule,
}

impl CapacityPolicy {
    pub const UNCHECKED: CapacityPolicy = CapacityPolicy {
        enforce: false,
        rule: OccupancyRule::BASELINE,
    };

    pub fn enforced(rule: OccupancyRule) -> Self {
        Self {
            enforce: true,
            rule,
        }
    }

    /// Reject `projected` (held occupancy including the change being made)
    /// when it exceeds `place_count`.
    pub fn check(&self, time_span_id: i32, place_count: i32, projected: Occupancy) -> DomainResult<()> {
        if !self.enforce {
            return Ok(());
        }
        let needed = self.rule.places(projected);
        if needed > place_count as i64 {
            return Err(DomainError::Conflict(format!(
                "time-span {} has {} places, {} requested",
                time_span_id, place_count, needed
            )));
        }
        Ok(())
    }
}

// ── Bulk status updates ────────────────────────────────────────

/// Result of a bulk status update, split by what happened to each id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusUpdateOutcome {
    /// Ids moved to the target status
    pub updated: Vec<i32>,
    /// Ids already in the target status
    pub unchanged: Vec<i32>,
    /// Ids that are missing, foreign, or not eligible for the transition
    pub unmatched: Vec<i32>,
}

impl StatusUpdateOutcome {
    /// Sort requested ids into the three buckets given the current status of
    /// the rows visible to the caller. Duplicate ids are reported once.
    pub fn partition(
        requested: &[i32],
        current: &[(i32, ReservationStatus)],
        transition: &StatusTransition,
    ) -> Self {
        let ids: BTreeSet<i32> = requested.iter().copied().collect();
        let mut outcome = Self::default();
        for id in ids {
            match current.iter().find(|(row_id, _)| *row_id == id) {
                Some((_, status)) if *status == transition.to => outcome.unchanged.push(id),
                Some((_, status)) if transition.applies_to(*status) => outcome.updated.push(id),
                _ => outcome.unmatched.push(id),
            }
        }
        outcome
    }

    pub fn merge(&mut self, other: StatusUpdateOutcome) {
        self.updated.extend(other.updated);
        self.unchanged.extend(other.unchanged);
        self.unmatched.extend(other.unmatched);
    }
}

// ── Tests ──────────────────────────────────────────────────────
