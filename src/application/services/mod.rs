//! Application services

mod availability;
mod capacity;
mod catalog;
mod favourites;
mod ledger;

#[cfg(test)]
pub(crate) mod test_support;

pub use availability::{AvailabilityService, QueryLimits, StatusView, TourFull, DEFAULT_POPULAR_LIMIT};
pub use capacity::{CapacityAccountant, SpanAvailability};
pub use catalog::CatalogService;
pub use favourites::FavouriteService;
pub use ledger::ReservationLedger;

use std::sync::Arc;

use crate::domain::reservation::{CapacityPolicy, OccupancyRule};
use crate::domain::RepositoryProvider;

/// Knobs of the booking engine, filled from the `[booking]` config section
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingSettings {
    pub enforce_capacity: bool,
    pub occupancy_rule: OccupancyRule,
    pub limits: QueryLimits,
}

impl BookingSettings {
    pub fn capacity_policy(&self) -> CapacityPolicy {
        CapacityPolicy {
            enforce: self.enforce_capacity,
            rule: self.occupancy_rule,
        }
    }
}

/// All services wired to one repository provider
#[derive(Clone)]
pub struct BookingServices {
    pub ledger: Arc<ReservationLedger>,
    pub availability: Arc<AvailabilityService>,
    pub accountant: Arc<CapacityAccountant>,
    pub favourites: Arc<FavouriteService>,
    pub catalog: Arc<CatalogService>,
}

impl BookingServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, settings: BookingSettings) -> Self {
        let accountant = Arc::new(CapacityAccountant::new(
            repos.clone(),
            settings.occupancy_rule,
        ));
        Self {
            ledger: Arc::new(ReservationLedger::new(
                repos.clone(),
                settings.capacity_policy(),
            )),
            availability: Arc::new(AvailabilityService::new(
                repos.clone(),
                accountant.clone(),
                settings.limits,
            )),
            accountant,
            favourites: Arc::new(FavouriteService::new(repos.clone())),
            catalog: Arc::new(CatalogService::new(repos)),
        }
    }
}
