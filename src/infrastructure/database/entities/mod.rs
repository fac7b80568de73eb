//! Database entities module

pub mod company;
pub mod country;
pub mod customer;
pub mod favourite;
pub mod reservation;
pub mod reservation_status;
pub mod tour;
pub mod tour_info;
pub mod tour_time_span;

pub use company::Entity as Company;
pub use country::Entity as Country;
pub use customer::Entity as Customer;
pub use favourite::Entity as Favourite;
pub use reservation::Entity as Reservation;
pub use reservation_status::Entity as ReservationStatus;
pub use tour::Entity as Tour;
pub use tour_info::Entity as TourInfo;
pub use tour_time_span::Entity as TourTimeSpan;
