//! Reservation aggregate
//!
//! Contains the Reservation entity, the status vocabulary, capacity
//! accounting types, and the repository interface.

pub mod model;
pub mod repository;
pub mod status;

pub use model::{
    validate_count, CapacityPolicy, NewReservation, Occupancy, OccupancyRule, Reservation,
    StatusUpdateOutcome,
};
pub use repository::ReservationRepository;
pub use status::{is_seat_occupying, ReservationStatus, StatusPurpose, StatusTransition};
