//! # Tourbook
//!
//! Booking backend for tour operators: reservation lifecycle, seat
//! accounting per departure, and customer favourites.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core entities, status vocabulary and repository traits
//! - **application**: Use cases (ledger, availability queries, favourites, catalog)
//! - **infrastructure**: SeaORM repositories, migrations and the in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, pagination, slugs and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;

pub use application::{BookingServices, BookingSettings};
pub use shared::types::{DomainError, DomainResult};
