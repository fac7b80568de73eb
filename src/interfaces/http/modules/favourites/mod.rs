//! Favourite tours of the calling customer

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
