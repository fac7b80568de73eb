//! Tour pages, popular tours and booking

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
