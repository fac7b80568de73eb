//! Tour aggregate

pub mod model;
pub mod repository;

pub use model::{nearest_time_span, NewTimeSpan, NewTour, Tour, TourInfo, TourSummary, TourTimeSpan};
pub use repository::TourRepository;
