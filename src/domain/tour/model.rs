//! Tour domain entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::shared::types::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Tour {
    pub id: i32,
    pub company_id: i32,
    pub country_id: i32,
    pub title: String,
    pub slug: String,
    pub img_preview_url: String,
    pub price: Decimal,
    pub short_description: String,
}

/// Tour as listed to customers, with the names of its company and country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TourSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub img_preview_url: String,
    pub price: Decimal,
    pub short_description: String,
    pub company_name: String,
    pub company_slug: String,
    pub country_name: String,
    pub favourites_count: i64,
}

/// Optional one-to-one detail page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TourInfo {
    pub tour_id: i32,
    pub description: String,
    pub img_url: String,
    pub img_background_url: String,
    pub placed: String,
}

/// A scheduled departure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TourTimeSpan {
    pub id: i32,
    pub tour_id: i32,
    pub group_name: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub place_count: i32,
}

impl TourTimeSpan {
    pub fn has_departed(&self, now: DateTime<Utc>) -> bool {
        self.date_to < now
    }
}

/// The departure a new reservation attaches to: latest `date_to`, lowest id
/// on ties.
pub fn nearest_time_span<'a, I>(spans: I) -> Option<&'a TourTimeSpan>
where
    I: IntoIterator<Item = &'a TourTimeSpan>,
{
    spans
        .into_iter()
        .max_by(|a, b| a.date_to.cmp(&b.date_to).then_with(|| b.id.cmp(&a.id)))
}

#[derive(Debug, Clone)]
pub struct NewTour {
    pub company_id: i32,
    pub country_id: i32,
    pub title: String,
    pub img_preview_url: String,
    pub price: Decimal,
    pub short_description: String,
}

impl NewTour {
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be blank"));
        }
        if self.price.is_sign_negative() {
            return Err(DomainError::validation("price", "must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewTimeSpan {
    pub tour_id: i32,
    pub group_name: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub place_count: i32,
}

impl NewTimeSpan {
    pub fn validate(&self) -> DomainResult<()> {
        if self.group_name.trim().is_empty() {
            return Err(DomainError::validation("group_name", "must not be blank"));
        }
        if self.place_count <= 0 {
            return Err(DomainError::validation(
                "place_count",
                format!("must be positive, got {}", self.place_count),
            ));
        }
        if self.date_from > self.date_to {
            return Err(DomainError::validation(
                "date_to",
                "must not be earlier than date_from",
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
