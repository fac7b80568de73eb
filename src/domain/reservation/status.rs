//! Reservation status vocabulary
//!
//! The seven statuses are seeded into the `reservation_statuses` table and
//! never edited at runtime. Code that filters reservations by status asks a
//! [`StatusPurpose`] for its set instead of listing statuses inline.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Paid,
    Declined,
    Completed,
    Waiting,
    Moved,
    PaidBack,
    NoShow,
}

impl ReservationStatus {
    /// Every status, in seeding order
    pub const ALL: [ReservationStatus; 7] = [
        Self::Paid,
        Self::Declined,
        Self::Completed,
        Self::Waiting,
        Self::Moved,
        Self::PaidBack,
        Self::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Declined => "declined",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Moved => "moved",
            Self::PaidBack => "paid_back",
            Self::NoShow => "no_show",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == code)
    }

    /// Human-readable label shown to customers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Оплачено",
            Self::Declined => "Отклонено",
            Self::Completed => "Завершено",
            Self::Waiting => "Ожидание оплаты",
            Self::Moved => "Перенесено",
            Self::PaidBack => "Возврат средств",
            Self::NoShow => "Клиент не явился",
        }
    }

    /// Statuses a reservation may be in to move into `self`.
    ///
    /// Nothing moves back to `waiting`; `completed` is reachable from
    /// every other status.
    pub fn allowed_sources(&self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Waiting => &[],
            Paid => &[Waiting],
            Declined | PaidBack | Moved | NoShow => &[Waiting, Paid],
            Completed => &[Paid, Declined, Waiting, Moved, PaidBack, NoShow],
        }
    }

    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        target.allowed_sources().contains(self)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named status sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPurpose {
    /// Seats counted as taken by `places_released`
    Occupying,
    /// Reservations still awaiting payment
    Pending,
    /// Seats spoken for when checking capacity at booking time
    Held,
}

impl StatusPurpose {
    pub fn statuses(&self) -> &'static [ReservationStatus] {
        match self {
            Self::Occupying => &[ReservationStatus::Paid],
            Self::Pending => &[ReservationStatus::Waiting],
            Self::Held => &[ReservationStatus::Paid, ReservationStatus::Waiting],
        }
    }

    pub fn contains(&self, status: ReservationStatus) -> bool {
        self.statuses().contains(&status)
    }
}

pub fn is_seat_occupying(status: ReservationStatus) -> bool {
    StatusPurpose::Occupying.contains(status)
}

/// A status change applied to a batch of reservations: rows currently in
/// one of `from` move to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: &'static [ReservationStatus],
    pub to: ReservationStatus,
}

impl StatusTransition {
    /// Operator transition honoring [`ReservationStatus::allowed_sources`]
    pub fn into_status(to: ReservationStatus) -> Self {
        Self {
            from: to.allowed_sources(),
            to,
        }
    }

    /// Customer payment: pending reservations become paid
    pub fn mark_paid() -> Self {
        Self {
            from: StatusPurpose::Pending.statuses(),
            to: ReservationStatus::Paid,
        }
    }

    /// Paid reservations whose departure has passed become completed
    pub fn complete_departed() -> Self {
        Self {
            from: StatusPurpose::Occupying.statuses(),
            to: ReservationStatus::Completed,
        }
    }

    pub fn applies_to(&self, current: ReservationStatus) -> bool {
        current != self.to && self.from.contains(&current)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for status in ReservationStatus::ALL {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("refunded"), None);
    }

    #[test]
    fn only_paid_occupies_a_seat() {
        let occupying: Vec<_> = ReservationStatus::ALL
            .into_iter()
            .filter(|s| is_seat_occupying(*s))
            .collect();
        assert_eq!(occupying, vec![ReservationStatus::Paid]);
    }

    #[test]
    fn nothing_returns_to_waiting() {
        for status in ReservationStatus::ALL {
            assert!(!status.can_transition_to(ReservationStatus::Waiting));
        }
    }

    #[test]
    fn transition_table() {
        use ReservationStatus::*;
        assert!(Waiting.can_transition_to(Paid));
        assert!(!Declined.can_transition_to(Paid));
        assert!(Paid.can_transition_to(PaidBack));
        assert!(Waiting.can_transition_to(NoShow));
        assert!(!Completed.can_transition_to(Moved));
        for status in ReservationStatus::ALL {
            if status != Completed {
                assert!(status.can_transition_to(Completed));
            }
        }
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&ReservationStatus::PaidBack).unwrap();
        assert_eq!(json, "\"paid_back\"");
    }
}
