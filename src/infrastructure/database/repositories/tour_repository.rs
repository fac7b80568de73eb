//! SeaORM implementation of TourRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use super::db_err;
use crate::domain::tour::{
    NewTimeSpan, NewTour, Tour, TourInfo, TourRepository, TourSummary, TourTimeSpan,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{company, country, favourite, tour, tour_info, tour_time_span};

pub struct SeaOrmTourRepository {
    db: DatabaseConnection,
}

impl SeaOrmTourRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn tour_to_domain(m: tour::Model) -> Tour {
    Tour {
        id: m.id,
        company_id: m.company_id,
        country_id: m.country_id,
        title: m.title,
        slug: m.slug,
        img_preview_url: m.img_preview_url,
        price: m.price,
        short_description: m.short_description,
    }
}

fn info_to_domain(m: tour_info::Model) -> TourInfo {
    TourInfo {
        tour_id: m.tour_id,
        description: m.description,
        img_url: m.img_url,
        img_background_url: m.img_background_url,
        placed: m.placed,
    }
}

fn span_to_domain(m: tour_time_span::Model) -> TourTimeSpan {
    TourTimeSpan {
        id: m.id,
        tour_id: m.tour_id,
        group_name: m.group_name,
        date_from: m.date_from,
        date_to: m.date_to,
        place_count: m.place_count,
    }
}

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: i32,
    title: String,
    slug: String,
    img_preview_url: String,
    price: Decimal,
    short_description: String,
    company_name: String,
    company_slug: String,
    country_name: String,
    favourites_count: i64,
}

impl From<SummaryRow> for TourSummary {
    fn from(r: SummaryRow) -> Self {
        TourSummary {
            id: r.id,
            title: r.title,
            slug: r.slug,
            img_preview_url: r.img_preview_url,
            price: r.price,
            short_description: r.short_description,
            company_name: r.company_name,
            company_slug: r.company_slug,
            country_name: r.country_name,
            favourites_count: r.favourites_count,
        }
    }
}

/// Tours joined with company, country and their favourites count
fn summary_query() -> Select<tour::Entity> {
    tour::Entity::find()
        .select_only()
        .columns([
            tour::Column::Id,
            tour::Column::Title,
            tour::Column::Slug,
            tour::Column::ImgPreviewUrl,
            tour::Column::Price,
            tour::Column::ShortDescription,
        ])
        .column_as(company::Column::Name, "company_name")
        .column_as(company::Column::Slug, "company_slug")
        .column_as(country::Column::Name, "country_name")
        .column_as(favourite::Column::Id.count(), "favourites_count")
        .join(JoinType::InnerJoin, tour::Relation::Company.def())
        .join(JoinType::InnerJoin, tour::Relation::Country.def())
        .join(JoinType::LeftJoin, tour::Relation::Favourites.def())
        .group_by(tour::Column::Id)
        .group_by(company::Column::Id)
        .group_by(country::Column::Id)
}

// ── TourRepository impl ─────────────────────────────────────────

#[async_trait]
impl TourRepository for SeaOrmTourRepository {
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tour>> {
        let model = tour::Entity::find()
            .filter(tour::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(tour_to_domain))
    }

    async fn find_summary_by_slug(&self, slug: &str) -> DomainResult<Option<TourSummary>> {
        let row = summary_query()
            .filter(tour::Column::Slug.eq(slug))
            .into_model::<SummaryRow>()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(TourSummary::from))
    }

    async fn slug_exists(&self, slug: &str) -> DomainResult<bool> {
        let count = tour::Entity::find()
            .filter(tour::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, new: NewTour, slug: String) -> DomainResult<Tour> {
        debug!("Inserting tour: {}", slug);
        let model = tour::ActiveModel {
            company_id: Set(new.company_id),
            country_id: Set(new.country_id),
            title: Set(new.title),
            slug: Set(slug),
            img_preview_url: Set(new.img_preview_url),
            price: Set(new.price),
            short_description: Set(new.short_description),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(tour_to_domain(model))
    }

    async fn find_info(&self, tour_id: i32) -> DomainResult<Option<TourInfo>> {
        let model = tour_info::Entity::find()
            .filter(tour_info::Column::TourId.eq(tour_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(info_to_domain))
    }

    async fn upsert_info(&self, info: TourInfo) -> DomainResult<TourInfo> {
        debug!("Saving info of tour {}", info.tour_id);
        let model = tour_info::ActiveModel {
            tour_id: Set(info.tour_id),
            description: Set(info.description.clone()),
            img_url: Set(info.img_url.clone()),
            img_background_url: Set(info.img_background_url.clone()),
            placed: Set(info.placed.clone()),
            ..Default::default()
        };
        tour_info::Entity::insert(model)
            .on_conflict(
                OnConflict::column(tour_info::Column::TourId)
                    .update_columns([
                        tour_info::Column::Description,
                        tour_info::Column::ImgUrl,
                        tour_info::Column::ImgBackgroundUrl,
                        tour_info::Column::Placed,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(info)
    }

    async fn add_time_span(&self, new: NewTimeSpan) -> DomainResult<TourTimeSpan> {
        debug!("Adding time-span '{}' to tour {}", new.group_name, new.tour_id);
        let model = tour_time_span::ActiveModel {
            tour_id: Set(new.tour_id),
            group_name: Set(new.group_name),
            date_from: Set(new.date_from),
            date_to: Set(new.date_to),
            place_count: Set(new.place_count),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(span_to_domain(model))
    }

    async fn find_time_span(&self, id: i32) -> DomainResult<Option<TourTimeSpan>> {
        let model = tour_time_span::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(span_to_domain))
    }

    async fn nearest_time_span(&self, tour_id: i32) -> DomainResult<Option<TourTimeSpan>> {
        let model = tour_time_span::Entity::find()
            .filter(tour_time_span::Column::TourId.eq(tour_id))
            .order_by_desc(tour_time_span::Column::DateTo)
            .order_by_asc(tour_time_span::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(span_to_domain))
    }

    async fn popular(&self, limit: u64) -> DomainResult<Vec<TourSummary>> {
        let rows = summary_query()
            .order_by_desc(favourite::Column::Id.count())
            .order_by_asc(tour::Column::Id)
            .limit(limit)
            .into_model::<SummaryRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(TourSummary::from).collect())
    }
}
