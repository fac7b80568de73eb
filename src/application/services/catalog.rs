//! Catalog writes: companies, countries, tours and their departures

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::{Company, Country, NewCompany};
use crate::domain::tour::{NewTimeSpan, NewTour, Tour, TourInfo, TourTimeSpan};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::slug::unique_slug;

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn tour(&self, slug: &str) -> DomainResult<Tour> {
        self.repos
            .tours()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", "slug", slug))
    }

    pub async fn create_company(&self, new: NewCompany) -> DomainResult<Company> {
        new.validate()?;
        let repos = &self.repos;
        let slug = unique_slug(&new.name, |candidate| async move {
            repos.catalog().company_slug_exists(&candidate).await
        })
        .await?;
        let company = self.repos.catalog().insert_company(new, slug).await?;
        info!(company_id = company.id, slug = %company.slug, "Company created");
        Ok(company)
    }

    pub async fn create_country(&self, name: &str) -> DomainResult<Country> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "must not be blank"));
        }
        self.repos.catalog().insert_country(name.to_string()).await
    }

    pub async fn create_tour(&self, new: NewTour) -> DomainResult<Tour> {
        new.validate()?;
        if self.repos.catalog().find_company(new.company_id).await?.is_none() {
            return Err(DomainError::not_found("Company", "id", new.company_id));
        }
        if self.repos.catalog().find_country(new.country_id).await?.is_none() {
            return Err(DomainError::not_found("Country", "id", new.country_id));
        }
        let repos = &self.repos;
        let slug = unique_slug(&new.title, |candidate| async move {
            repos.tours().slug_exists(&candidate).await
        })
        .await?;
        let tour = self.repos.tours().insert(new, slug).await?;
        info!(tour_id = tour.id, slug = %tour.slug, "Tour created");
        Ok(tour)
    }

    /// Create or replace the detail record of the tour. `tour_id` of the
    /// given info is ignored in favour of the slug.
    pub async fn set_tour_info(&self, slug: &str, info: TourInfo) -> DomainResult<TourInfo> {
        let tour = self.tour(slug).await?;
        self.repos
            .tours()
            .upsert_info(TourInfo {
                tour_id: tour.id,
                ..info
            })
            .await
    }

    /// Schedule a departure of the tour. `tour_id` of `new` is ignored in
    /// favour of the slug.
    pub async fn add_time_span(&self, slug: &str, new: NewTimeSpan) -> DomainResult<TourTimeSpan> {
        new.validate()?;
        let tour = self.tour(slug).await?;
        let span = self
            .repos
            .tours()
            .add_time_span(NewTimeSpan {
                tour_id: tour.id,
                ..new
            })
            .await?;
        info!(
            time_span_id = span.id,
            tour_id = span.tour_id,
            place_count = span.place_count,
            "Time-span added"
        );
        Ok(span)
    }
}
