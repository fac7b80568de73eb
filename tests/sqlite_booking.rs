//! Booking flows against the SeaORM repositories on an in-memory SQLite
//! database with all migrations applied.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

use tourbook::application::{BookingServices, BookingSettings};
use tourbook::domain::catalog::NewCompany;
use tourbook::domain::reservation::{OccupancyRule, ReservationStatus};
use tourbook::domain::tour::{NewTimeSpan, NewTour, Tour};
use tourbook::domain::{DomainError, RepositoryProvider};
use tourbook::infrastructure::database::entities::{customer, reservation_status};
use tourbook::infrastructure::database::migrator::Migrator;
use tourbook::shared::types::PaginationParams;
use tourbook::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

const ALICE: i32 = 1;
const BOB: i32 = 2;

struct Env {
    db: DatabaseConnection,
    repos: Arc<dyn RepositoryProvider>,
    services: BookingServices,
    company_id: i32,
    country_id: i32,
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 7, 1, 9, 0, 0).unwrap()
}

async fn seed_customer(db: &DatabaseConnection, login: &str) -> i32 {
    customer::ActiveModel {
        login: Set(login.to_string()),
        email: Set(format!("{login}@example.com")),
        credentials: Set(login.to_uppercase()),
        phone: Set("+79990000000".to_string()),
        password_hash: Set("x".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

impl Env {
    async fn new(settings: BookingSettings) -> Self {
        let db = init_database(&DatabaseConfig::sqlite_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        assert_eq!(seed_customer(&db, "alice").await, ALICE);
        assert_eq!(seed_customer(&db, "bob").await, BOB);

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let services = BookingServices::new(repos.clone(), settings);

        let company = services
            .catalog
            .create_company(NewCompany {
                name: "Alpha Travel".into(),
                phone: "+79990001122".into(),
                address: "Moscow".into(),
            })
            .await
            .unwrap();
        let country = services.catalog.create_country("Russia").await.unwrap();

        Self {
            db,
            repos,
            services,
            company_id: company.id,
            country_id: country.id,
        }
    }

    async fn tour(&self, title: &str) -> Tour {
        self.services
            .catalog
            .create_tour(NewTour {
                company_id: self.company_id,
                country_id: self.country_id,
                title: title.into(),
                img_preview_url: "https://img.example/p.jpg".into(),
                price: Decimal::new(1500, 0),
                short_description: "Mountains".into(),
            })
            .await
            .unwrap()
    }

    async fn span(&self, tour: &Tour, group: &str, days: i64, place_count: i32) -> i32 {
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
            .id
    }
}

#[tokio::test]
async fn migrations_seed_every_status() {
    let env = Env::new(BookingSettings::default()).await;
    let rows = reservation_status::Entity::find().all(&env.db).await.unwrap();
    let mut codes: Vec<_> = rows.into_iter().map(|r| r.status).collect();
    codes.sort();
    let mut expected: Vec<_> = ReservationStatus::ALL
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    expected.sort();
    assert_eq!(codes, expected);
}

#[tokio::test]
async fn places_released_counts_paid_reservations() {
    let env = Env::new(BookingSettings::default()).await;
    let tour = env.tour("Alpha Tour").await;
    let span_id = env.span(&tour, "June", 10, 20).await;
    let ledger = &env.services.ledger;

    let mut paid = Vec::new();
    for count in [2, 3, 4] {
        paid.push(ledger.reserve(ALICE, &tour.slug, Some(count)).await.unwrap().id);
    }
    ledger.reserve(ALICE, &tour.slug, Some(5)).await.unwrap();

    let outcome = ledger.mark_paid(ALICE, &paid).await.unwrap();
    assert_eq!(outcome.updated, paid);

    assert_eq!(env.services.accountant.places_released(span_id).await.unwrap(), 3);

    let seats = BookingServices::new(
        env.repos.clone(),
        BookingSettings {
            occupancy_rule: OccupancyRule::SeatSum,
            ..BookingSettings::default()
        },
    );
    assert_eq!(seats.accountant.places_released(span_id).await.unwrap(), 9);

    let page = env
        .services
        .availability
        .list_pending(ALICE, PaginationParams::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(env.services.availability.count_pending(ALICE).await.unwrap(), 1);
}

#[tokio::test]
async fn slugs_get_numeric_suffixes() {
    let env = Env::new(BookingSettings::default()).await;
    assert_eq!(env.tour("Alpha Tour").await.slug, "alpha-tour");
    assert_eq!(env.tour("Alpha Tour").await.slug, "alpha-tour-1");
    assert_eq!(env.tour("Alpha  tour!").await.slug, "alpha-tour-2");

    let full = env.services.availability.tour_full("alpha-tour-1").await.unwrap();
    assert_eq!(full.basic_info.title, "Alpha Tour");
    assert_eq!(full.basic_info.company_slug, "alpha-travel");
    assert!(full.time_span.is_none());
}

#[tokio::test]
async fn bulk_payment_reports_each_bucket() {
    let env = Env::new(BookingSettings::default()).await;
    let tour = env.tour("Alpha Tour").await;
    env.span(&tour, "June", 10, 20).await;
    let ledger = &env.services.ledger;

    let a = ledger.reserve(ALICE, &tour.slug, None).await.unwrap().id;
    let b = ledger.reserve(ALICE, &tour.slug, None).await.unwrap().id;
    let foreign = ledger.reserve(BOB, &tour.slug, None).await.unwrap().id;
    ledger.mark_paid(ALICE, &[b]).await.unwrap();

    let outcome = ledger.mark_paid(ALICE, &[a, b, foreign, 999]).await.unwrap();
    assert_eq!(outcome.updated, vec![a]);
    assert_eq!(outcome.unchanged, vec![b]);
    assert_eq!(outcome.unmatched, vec![foreign, 999]);

    let bob = env.repos.reservations().find_by_id(foreign).await.unwrap().unwrap();
    assert_eq!(bob.status, ReservationStatus::Waiting);
}

#[tokio::test]
async fn ownership_mismatch_is_not_found() {
    let env = Env::new(BookingSettings::default()).await;
    let tour = env.tour("Alpha Tour").await;
    env.span(&tour, "June", 10, 20).await;
    let ledger = &env.services.ledger;
    let id = ledger.reserve(ALICE, &tour.slug, None).await.unwrap().id;

    assert!(matches!(
        ledger.update_count(id, BOB, 4).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        ledger.delete(id, BOB).await,
        Err(DomainError::NotFound { .. })
    ));

    assert_eq!(ledger.update_count(id, ALICE, 4).await.unwrap().count, 4);
    ledger.delete(id, ALICE).await.unwrap();
    assert!(matches!(
        ledger.delete(id, ALICE).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn enforced_capacity_refuses_overbooking() {
    let env = Env::new(BookingSettings {
        enforce_capacity: true,
        occupancy_rule: OccupancyRule::SeatSum,
        ..BookingSettings::default()
    })
    .await;
    let tour = env.tour("Small Group").await;
    env.span(&tour, "June", 10, 3).await;
    let ledger = &env.services.ledger;

    let first = ledger.reserve(ALICE, &tour.slug, Some(2)).await.unwrap();
    assert!(matches!(
        ledger.reserve(BOB, &tour.slug, Some(2)).await,
        Err(DomainError::Conflict(_))
    ));
    ledger.reserve(BOB, &tour.slug, Some(1)).await.unwrap();

    assert!(matches!(
        ledger.update_count(first.id, ALICE, 3).await,
        Err(DomainError::Conflict(_))
    ));
    assert_eq!(ledger.update_count(first.id, ALICE, 1).await.unwrap().count, 1);
}

#[tokio::test]
async fn nearest_span_is_latest_departure() {
    let env = Env::new(BookingSettings::default()).await;
    let tour = env.tour("Alpha Tour").await;
    env.span(&tour, "Early", 5, 10).await;
    let late = env.span(&tour, "Late", 30, 10).await;

    let reservation = env
        .services
        .ledger
        .reserve(ALICE, &tour.slug, None)
        .await
        .unwrap();
    assert_eq!(reservation.time_span_id, late);

    let full = env.services.availability.tour_full(&tour.slug).await.unwrap();
    let span = full.time_span.unwrap();
    assert_eq!(span.id, late);
    assert_eq!(span.places_released, 0);
    assert_eq!(span.places_left, 10);
}

#[tokio::test]
async fn favourites_and_popular_tours() {
    let env = Env::new(BookingSettings::default()).await;
    let alpha = env.tour("Alpha Tour").await;
    let beta = env.tour("Beta Tour").await;
    let favourites = &env.services.favourites;

    assert!(favourites.add(ALICE, &beta.slug).await.unwrap());
    assert!(!favourites.add(ALICE, &beta.slug).await.unwrap());
    favourites.add(BOB, &beta.slug).await.unwrap();
    favourites.add(BOB, &alpha.slug).await.unwrap();

    assert!(favourites.is_favourite(Some(ALICE), &beta.slug).await.unwrap());
    assert!(!favourites.is_favourite(None, &beta.slug).await.unwrap());
    assert!(!favourites.is_favourite(Some(ALICE), "nowhere").await.unwrap());

    let popular = env.services.availability.popular_tours(None).await.unwrap();
    let order: Vec<_> = popular.iter().map(|t| (t.slug.as_str(), t.favourites_count)).collect();
    assert_eq!(order, vec![("beta-tour", 2), ("alpha-tour", 1)]);

    favourites.remove(ALICE, &beta.slug).await.unwrap();
    favourites.remove(ALICE, &beta.slug).await.unwrap();
    assert_eq!(favourites.clear(BOB).await.unwrap(), 2);
    assert!(favourites.list(BOB).await.unwrap().is_empty());
}

#[tokio::test]
async fn departed_paid_reservations_complete_once() {
    let env = Env::new(BookingSettings::default()).await;
    let tour = env.tour("Alpha Tour").await;
    env.span(&tour, "June", 1, 10).await;
    let ledger = &env.services.ledger;

    let paid = ledger.reserve(ALICE, &tour.slug, None).await.unwrap().id;
    let waiting = ledger.reserve(ALICE, &tour.slug, None).await.unwrap().id;
    ledger.mark_paid(ALICE, &[paid]).await.unwrap();

    let before = ledger.complete_departed(base_time()).await.unwrap();
    assert!(before.updated.is_empty());

    let after = base_time() + Duration::days(2);
    let first = ledger.complete_departed(after).await.unwrap();
    assert_eq!(first.updated, vec![paid]);
    let second = ledger.complete_departed(after).await.unwrap();
    assert!(second.updated.is_empty());

    let repo = env.repos.reservations();
    let paid = repo.find_by_id(paid).await.unwrap().unwrap();
    let waiting = repo.find_by_id(waiting).await.unwrap().unwrap();
    assert_eq!(paid.status, ReservationStatus::Completed);
    assert_eq!(waiting.status, ReservationStatus::Waiting);
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let env = Env::new(BookingSettings::default()).await;
    let tour = env.tour("Alpha Tour").await;
    env.span(&tour, "June", 10, 20).await;
    const STRANGER: i32 = 777;

    let err = env
        .services
        .ledger
        .reserve(STRANGER, &tour.slug, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Customer", .. }));

    let err = env
        .services
        .favourites
        .add(STRANGER, &tour.slug)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Customer", .. }));

    let err = env
        .services
        .favourites
        .toggle(STRANGER, &tour.slug)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Customer", .. }));

    assert_eq!(env.services.availability.count_pending(STRANGER).await.unwrap(), 0);
}
