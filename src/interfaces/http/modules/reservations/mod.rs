//! Customer reservations: pending list, history, edits and payment

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
