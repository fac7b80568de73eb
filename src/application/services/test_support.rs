//! Shared fixtures for service tests: an in-memory store with one company,
//! one country and a few tours.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use super::{BookingServices, BookingSettings};
use crate::domain::catalog::NewCompany;
use crate::domain::tour::{NewTimeSpan, NewTour, Tour, TourTimeSpan};
use crate::infrastructure::storage::InMemoryStorage;

pub const ALICE: i32 = 1;
pub const BOB: i32 = 2;

pub struct Fixture {
    pub services: BookingServices,
    pub company_id: i32,
    pub country_id: i32,
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 7, 1, 9, 0, 0).unwrap()
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_settings(BookingSettings::default()).await
    }

    pub async fn with_settings(settings: BookingSettings) -> Self {
        let repos = Arc::new(InMemoryStorage::new());
        let services = BookingServices::new(repos, settings);
        let company = services
            .catalog
            .create_company(NewCompany {
                name: "Alpha Travel".into(),
                phone: "+79990001122".into(),
                address: "Moscow, Tverskaya 1".into(),
            })
            .await
            .unwrap();
        let country = services.catalog.create_country("Russia").await.unwrap();
        Self {
            services,
            company_id: company.id,
            country_id: country.id,
        }
    }

    pub async fn tour(&self, title: &str) -> Tour {
        self.services
            .catalog
            .create_tour(NewTour {
                company_id: self.company_id,
                country_id: self.country_id,
                title: title.into(),
                img_preview_url: "https://img.example/preview.jpg".into(),
                price: Decimal::new(150_000, 2),
                short_description: "Three days in the mountains".into(),
            })
            .await
            .unwrap()
    }

    /// Departure ending `days` after [`base_time`]
    pub async fn span(&self, tour: &Tour, group: &str, days: i64, place_count: i32) -> TourTimeSpan {
        let date_to = base_time() + Duration::days(days);
        self.services
            .catalog
            .add_time_span(
                &tour.slug,
                NewTimeSpan {
                    tour_id: tour.id,
                    group_name: group.into(),
                    date_from: date_to - Duration::days(3),
                    date_to,
                    place_count,
                },
            )
            .await
            .unwrap()
    }
}
