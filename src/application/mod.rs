//! Application layer: use-cases over the domain repositories

pub mod services;

pub use services::{
    AvailabilityService, BookingServices, BookingSettings, CapacityAccountant, CatalogService,
    FavouriteService, QueryLimits, ReservationLedger, SpanAvailability, StatusView, TourFull,
};
