//! In-memory storage implementation
//!
//! Catalog data and favourites live in `DashMap`s. Reservations sit behind a
//! single mutex so that a capacity check and the insert that follows it
//! happen under one lock, mirroring the row lock taken by the SQL backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::catalog::{CatalogRepository, Company, Country, NewCompany};
use crate::domain::favourite::{FavouriteRepository, FavouriteTour};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::{
    CapacityPolicy, NewReservation, Occupancy, Reservation, ReservationRepository,
    ReservationStatus, StatusPurpose, StatusTransition, StatusUpdateOutcome,
};
use crate::domain::tour::{
    nearest_time_span, NewTimeSpan, NewTour, Tour, TourInfo, TourRepository, TourSummary,
    TourTimeSpan,
};
use crate::domain::{DomainError, DomainResult};
use crate::shared::types::{PaginatedResult, PaginationParams};

/// In-memory storage for development and testing
pub struct InMemoryStorage {
    companies: DashMap<i32, Company>,
    company_names: DashMap<String, i32>,
    company_slugs: DashMap<String, i32>,
    countries: DashMap<i32, Country>,
    country_names: DashMap<String, i32>,
    tours: DashMap<i32, Tour>,
    tour_slugs: DashMap<String, i32>,
    tour_infos: DashMap<i32, TourInfo>,
    time_spans: DashMap<i32, TourTimeSpan>,
    /// (customer_id, tour_id) -> insertion sequence
    favourites: DashMap<(i32, i32), i32>,
    reservations: Mutex<BTreeMap<i32, Reservation>>,
    company_counter: AtomicI32,
    country_counter: AtomicI32,
    tour_counter: AtomicI32,
    time_span_counter: AtomicI32,
    favourite_counter: AtomicI32,
    reservation_counter: AtomicI32,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            companies: DashMap::new(),
            company_names: DashMap::new(),
            company_slugs: DashMap::new(),
            countries: DashMap::new(),
            country_names: DashMap::new(),
            tours: DashMap::new(),
            tour_slugs: DashMap::new(),
            tour_infos: DashMap::new(),
            time_spans: DashMap::new(),
            favourites: DashMap::new(),
            reservations: Mutex::new(BTreeMap::new()),
            company_counter: AtomicI32::new(1),
            country_counter: AtomicI32::new(1),
            tour_counter: AtomicI32::new(1),
            time_span_counter: AtomicI32::new(1),
            favourite_counter: AtomicI32::new(1),
            reservation_counter: AtomicI32::new(1),
        }
    }

    fn ledger(&self) -> DomainResult<MutexGuard<'_, BTreeMap<i32, Reservation>>> {
        self.reservations
            .lock()
            .map_err(|_| DomainError::Storage("reservation ledger lock poisoned".to_string()))
    }

    fn time_span(&self, id: i32) -> DomainResult<TourTimeSpan> {
        self.time_spans
            .get(&id)
            .map(|s| s.value().clone())
            .ok_or_else(|| DomainError::not_found("TourTimeSpan", "id", id))
    }

    fn favourites_count(&self, tour_id: i32) -> i64 {
        self.favourites
            .iter()
            .filter(|e| e.key().1 == tour_id)
            .count() as i64
    }

    /// Inner-join semantics: tours whose company or country is gone are skipped
    fn summary(&self, tour: &Tour) -> Option<TourSummary> {
        let company = self.companies.get(&tour.company_id)?;
        let country = self.countries.get(&tour.country_id)?;
        Some(TourSummary {
            id: tour.id,
            title: tour.title.clone(),
            slug: tour.slug.clone(),
            img_preview_url: tour.img_preview_url.clone(),
            price: tour.price,
            short_description: tour.short_description.clone(),
            company_name: company.name.clone(),
            company_slug: company.slug.clone(),
            country_name: country.name.clone(),
            favourites_count: self.favourites_count(tour.id),
        })
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn occupancy_of<'a>(
    rows: impl Iterator<Item = &'a Reservation>,
    time_span_id: i32,
    statuses: &[ReservationStatus],
    exclude: Option<i32>,
) -> Occupancy {
    rows.filter(|r| r.time_span_id == time_span_id)
        .filter(|r| statuses.contains(&r.status))
        .filter(|r| Some(r.id) != exclude)
        .fold(Occupancy::default(), |acc, r| acc.with_reservation(r.count))
}

fn matches_statuses(r: &Reservation, statuses: Option<&[ReservationStatus]>) -> bool {
    statuses.map_or(true, |s| s.contains(&r.status))
}

impl RepositoryProvider for InMemoryStorage {
    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn tours(&self) -> &dyn TourRepository {
        self
    }

    fn favourites(&self) -> &dyn FavouriteRepository {
        self
    }

    fn catalog(&self) -> &dyn CatalogRepository {
        self
    }
}

// ── ReservationRepository ───────────────────────────────────────

#[async_trait]
impl ReservationRepository for InMemoryStorage {
    async fn insert(&self, new: NewReservation, policy: CapacityPolicy) -> DomainResult<Reservation> {
        let span = self.time_span(new.time_span_id)?;
        let mut ledger = self.ledger()?;

        if policy.enforce {
            let held = occupancy_of(ledger.values(), span.id, StatusPurpose::Held.statuses(), None);
            policy.check(span.id, span.place_count, held.with_reservation(new.count))?;
        }

        let reservation = Reservation {
            id: self.reservation_counter.fetch_add(1, Ordering::SeqCst),
            customer_id: new.customer_id,
            time_span_id: new.time_span_id,
            status: ReservationStatus::Waiting,
            count: new.count,
        };
        ledger.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.ledger()?.get(&id).cloned())
    }

    async fn update_count(
        &self,
        id: i32,
        owner: i32,
        count: i32,
        policy: CapacityPolicy,
    ) -> DomainResult<Option<Reservation>> {
        let mut ledger = self.ledger()?;
        let Some(existing) = ledger.get(&id).filter(|r| r.is_owned_by(owner)).cloned() else {
            return Ok(None);
        };

        if policy.enforce && count > existing.count {
            let span = self.time_span(existing.time_span_id)?;
            let others = occupancy_of(
                ledger.values(),
                span.id,
                StatusPurpose::Held.statuses(),
                Some(existing.id),
            );
            policy.check(span.id, span.place_count, others.with_reservation(count))?;
        }

        let updated = Reservation { count, ..existing };
        ledger.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_owned(&self, id: i32, owner: i32) -> DomainResult<bool> {
        let mut ledger = self.ledger()?;
        if ledger.get(&id).is_some_and(|r| r.is_owned_by(owner)) {
            ledger.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn transition_status(
        &self,
        requested: &[i32],
        owner: Option<i32>,
        transition: StatusTransition,
    ) -> DomainResult<StatusUpdateOutcome> {
        let mut ledger = self.ledger()?;
        let current: Vec<(i32, ReservationStatus)> = requested
            .iter()
            .filter_map(|id| ledger.get(id))
            .filter(|r| owner.map_or(true, |o| r.is_owned_by(o)))
            .map(|r| (r.id, r.status))
            .collect();

        let outcome = StatusUpdateOutcome::partition(requested, &current, &transition);
        for id in &outcome.updated {
            if let Some(r) = ledger.get_mut(id) {
                r.status = transition.to;
            }
        }
        Ok(outcome)
    }

    async fn list_for_customer(
        &self,
        customer_id: i32,
        statuses: Option<&[ReservationStatus]>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>> {
        let ledger = self.ledger()?;
        let matching: Vec<&Reservation> = ledger
            .values()
            .filter(|r| r.is_owned_by(customer_id) && matches_statuses(r, statuses))
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn count_for_customer(
        &self,
        customer_id: i32,
        statuses: Option<&[ReservationStatus]>,
    ) -> DomainResult<u64> {
        let ledger = self.ledger()?;
        Ok(ledger
            .values()
            .filter(|r| r.is_owned_by(customer_id) && matches_statuses(r, statuses))
            .count() as u64)
    }

    async fn occupancy(
        &self,
        time_span_id: i32,
        statuses: &[ReservationStatus],
    ) -> DomainResult<Occupancy> {
        let ledger = self.ledger()?;
        Ok(occupancy_of(ledger.values(), time_span_id, statuses, None))
    }

    async fn find_ids_departed_before(
        &self,
        now: DateTime<Utc>,
        statuses: &[ReservationStatus],
    ) -> DomainResult<Vec<i32>> {
        let ledger = self.ledger()?;
        Ok(ledger
            .values()
            .filter(|r| statuses.contains(&r.status))
            .filter(|r| {
                self.time_spans
                    .get(&r.time_span_id)
                    .is_some_and(|s| s.has_departed(now))
            })
            .map(|r| r.id)
            .collect())
    }
}

// ── TourRepository ──────────────────────────────────────────────

#[async_trait]
impl TourRepository for InMemoryStorage {
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tour>> {
        let Some(id) = self.tour_slugs.get(slug).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.tours.get(&id).map(|t| t.value().clone()))
    }

    async fn find_summary_by_slug(&self, slug: &str) -> DomainResult<Option<TourSummary>> {
        let tour = self.find_by_slug(slug).await?;
        Ok(tour.and_then(|t| self.summary(&t)))
    }

    async fn slug_exists(&self, slug: &str) -> DomainResult<bool> {
        Ok(self.tour_slugs.contains_key(slug))
    }

    async fn insert(&self, new: NewTour, slug: String) -> DomainResult<Tour> {
        let id = match self.tour_slugs.entry(slug.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!("tour slug '{}' is taken", slug)))
            }
            Entry::Vacant(v) => {
                let id = self.tour_counter.fetch_add(1, Ordering::SeqCst);
                v.insert(id);
                id
            }
        };
        let tour = Tour {
            id,
            company_id: new.company_id,
            country_id: new.country_id,
            title: new.title,
            slug,
            img_preview_url: new.img_preview_url,
            price: new.price,
            short_description: new.short_description,
        };
        self.tours.insert(id, tour.clone());
        Ok(tour)
    }

    async fn find_info(&self, tour_id: i32) -> DomainResult<Option<TourInfo>> {
        Ok(self.tour_infos.get(&tour_id).map(|i| i.value().clone()))
    }

    async fn upsert_info(&self, info: TourInfo) -> DomainResult<TourInfo> {
        self.tour_infos.insert(info.tour_id, info.clone());
        Ok(info)
    }

    async fn add_time_span(&self, new: NewTimeSpan) -> DomainResult<TourTimeSpan> {
        let span = TourTimeSpan {
            id: self.time_span_counter.fetch_add(1, Ordering::SeqCst),
            tour_id: new.tour_id,
            group_name: new.group_name,
            date_from: new.date_from,
            date_to: new.date_to,
            place_count: new.place_count,
        };
        self.time_spans.insert(span.id, span.clone());
        Ok(span)
    }

    async fn find_time_span(&self, id: i32) -> DomainResult<Option<TourTimeSpan>> {
        Ok(self.time_spans.get(&id).map(|s| s.value().clone()))
    }

    async fn nearest_time_span(&self, tour_id: i32) -> DomainResult<Option<TourTimeSpan>> {
        let spans: Vec<TourTimeSpan> = self
            .time_spans
            .iter()
            .filter(|s| s.tour_id == tour_id)
            .map(|s| s.value().clone())
            .collect();
        Ok(nearest_time_span(&spans).cloned())
    }

    async fn popular(&self, limit: u64) -> DomainResult<Vec<TourSummary>> {
        let mut summaries: Vec<TourSummary> = self
            .tours
            .iter()
            .filter_map(|t| self.summary(t.value()))
            .collect();
        summaries.sort_by(|a, b| {
            b.favourites_count
                .cmp(&a.favourites_count)
                .then_with(|| a.id.cmp(&b.id))
        });
        summaries.truncate(limit as usize);
        Ok(summaries)
    }
}

// ── FavouriteRepository ─────────────────────────────────────────

#[async_trait]
impl FavouriteRepository for InMemoryStorage {
    async fn exists(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool> {
        Ok(self.favourites.contains_key(&(customer_id, tour_id)))
    }

    async fn add(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool> {
        match self.favourites.entry((customer_id, tour_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(v) => {
                v.insert(self.favourite_counter.fetch_add(1, Ordering::SeqCst));
                Ok(true)
            }
        }
    }

    async fn remove(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool> {
        Ok(self.favourites.remove(&(customer_id, tour_id)).is_some())
    }

    async fn clear(&self, customer_id: i32) -> DomainResult<u64> {
        let mut removed = 0u64;
        self.favourites.retain(|(customer, _), _| {
            let keep = *customer != customer_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn list(&self, customer_id: i32) -> DomainResult<Vec<FavouriteTour>> {
        let mut entries: Vec<(i32, i32)> = self
            .favourites
            .iter()
            .filter(|e| e.key().0 == customer_id)
            .map(|e| (*e.value(), e.key().1))
            .collect();
        entries.sort_unstable();
        Ok(entries
            .into_iter()
            .filter_map(|(_, tour_id)| self.tours.get(&tour_id))
            .map(|t| FavouriteTour {
                tour_id: t.id,
                slug: t.slug.clone(),
                title: t.title.clone(),
                price: t.price,
                img_preview_url: t.img_preview_url.clone(),
            })
            .collect())
    }
}

// ── CatalogRepository ───────────────────────────────────────────

#[async_trait]
impl CatalogRepository for InMemoryStorage {
    async fn company_slug_exists(&self, slug: &str) -> DomainResult<bool> {
        Ok(self.company_slugs.contains_key(slug))
    }

    async fn insert_company(&self, new: NewCompany, slug: String) -> DomainResult<Company> {
        let id = self.company_counter.fetch_add(1, Ordering::SeqCst);
        match self.company_names.entry(new.name.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!(
                    "company '{}' already exists",
                    new.name
                )))
            }
            Entry::Vacant(v) => {
                v.insert(id);
            }
        }
        match self.company_slugs.entry(slug.clone()) {
            Entry::Occupied(_) => {
                self.company_names.remove(&new.name);
                return Err(DomainError::Conflict(format!(
                    "company slug '{}' is taken",
                    slug
                )));
            }
            Entry::Vacant(v) => {
                v.insert(id);
            }
        }
        let company = Company {
            id,
            name: new.name,
            phone: new.phone,
            address: new.address,
            slug,
        };
        self.companies.insert(id, company.clone());
        Ok(company)
    }

    async fn find_company(&self, id: i32) -> DomainResult<Option<Company>> {
        Ok(self.companies.get(&id).map(|c| c.value().clone()))
    }

    async fn insert_country(&self, name: String) -> DomainResult<Country> {
        let id = match self.country_names.entry(name.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::Conflict(format!(
                    "country '{}' already exists",
                    name
                )))
            }
            Entry::Vacant(v) => {
                let id = self.country_counter.fetch_add(1, Ordering::SeqCst);
                v.insert(id);
                id
            }
        };
        let country = Country { id, name };
        self.countries.insert(id, country.clone());
        Ok(country)
    }

    async fn find_country(&self, id: i32) -> DomainResult<Option<Country>> {
        Ok(self.countries.get(&id).map(|c| c.value().clone()))
    }
}
