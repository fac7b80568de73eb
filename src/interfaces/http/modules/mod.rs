pub mod favourites;
pub mod health;
pub mod metrics;
pub mod reservations;
pub mod statuses;
pub mod tours;
