//! SeaORM implementation of FavouriteRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{customer_write_err, db_err};
use crate::domain::favourite::{FavouriteRepository, FavouriteTour};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{favourite, tour};

pub struct SeaOrmFavouriteRepository {
    db: DatabaseConnection,
}

impl SeaOrmFavouriteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct FavouriteRow {
    tour_id: i32,
    slug: String,
    title: String,
    price: Decimal,
    img_preview_url: String,
}

#[async_trait]
impl FavouriteRepository for SeaOrmFavouriteRepository {
    async fn exists(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool> {
        let count = favourite::Entity::find()
            .filter(favourite::Column::CustomerId.eq(customer_id))
            .filter(favourite::Column::TourId.eq(tour_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn add(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool> {
        debug!("Adding favourite: customer={} tour={}", customer_id, tour_id);
        let model = favourite::ActiveModel {
            customer_id: Set(customer_id),
            tour_id: Set(tour_id),
            ..Default::default()
        };
        let inserted = favourite::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([favourite::Column::CustomerId, favourite::Column::TourId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(customer_write_err(customer_id))?;
        Ok(inserted > 0)
    }

    async fn remove(&self, customer_id: i32, tour_id: i32) -> DomainResult<bool> {
        debug!("Removing favourite: customer={} tour={}", customer_id, tour_id);
        let result = favourite::Entity::delete_many()
            .filter(favourite::Column::CustomerId.eq(customer_id))
            .filter(favourite::Column::TourId.eq(tour_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn clear(&self, customer_id: i32) -> DomainResult<u64> {
        debug!("Clearing favourites of customer {}", customer_id);
        let result = favourite::Entity::delete_many()
            .filter(favourite::Column::CustomerId.eq(customer_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn list(&self, customer_id: i32) -> DomainResult<Vec<FavouriteTour>> {
        let rows = favourite::Entity::find()
            .select_only()
            .column_as(tour::Column::Id, "tour_id")
            .column(tour::Column::Slug)
            .column(tour::Column::Title)
            .column(tour::Column::Price)
            .column(tour::Column::ImgPreviewUrl)
            .inner_join(tour::Entity)
            .filter(favourite::Column::CustomerId.eq(customer_id))
            .order_by_asc(favourite::Column::Id)
            .into_model::<FavouriteRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|r| FavouriteTour {
                tour_id: r.tour_id,
                slug: r.slug,
                title: r.title,
                price: r.price,
                img_preview_url: r.img_preview_url,
            })
            .collect())
    }
}
