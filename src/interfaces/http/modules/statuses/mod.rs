//! Reservation status vocabulary

pub mod handlers;

pub use handlers::*;
