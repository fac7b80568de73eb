//! SeaORM implementation of ReservationRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{customer_write_err, db_err};
use super::status_catalog::{StatusCatalog, StatusIds};
use crate::domain::reservation::{
    CapacityPolicy, NewReservation, Occupancy, Reservation, ReservationRepository,
    ReservationStatus, StatusPurpose, StatusTransition, StatusUpdateOutcome,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{reservation, tour_time_span};
use crate::shared::types::{PaginatedResult, PaginationParams};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
    statuses: Arc<StatusCatalog>,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection, statuses: Arc<StatusCatalog>) -> Self {
        Self { db, statuses }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model, ids: &StatusIds) -> DomainResult<Reservation> {
    Ok(Reservation {
        id: m.id,
        customer_id: m.customer_id,
        time_span_id: m.time_span_id,
        status: ids.status_of(m.status_id)?,
        count: m.count,
    })
}

// ── Query helpers ───────────────────────────────────────────────

/// Read the time-span row, taking a row lock where the backend has them.
/// SQLite serializes writers at the database level instead.
async fn lock_time_span<C: ConnectionTrait>(
    conn: &C,
    time_span_id: i32,
) -> DomainResult<tour_time_span::Model> {
    let mut query = tour_time_span::Entity::find_by_id(time_span_id);
    if conn.get_database_backend() != DbBackend::Sqlite {
        query = query.lock_exclusive();
    }
    query
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("TourTimeSpan", "id", time_span_id))
}

async fn occupancy_on<C: ConnectionTrait>(
    conn: &C,
    time_span_id: i32,
    status_ids: Vec<i32>,
    exclude_reservation: Option<i32>,
) -> DomainResult<Occupancy> {
    let mut query = reservation::Entity::find()
        .select_only()
        .column_as(reservation::Column::Id.count(), "reservations")
        .column_as(reservation::Column::Count.sum(), "seats")
        .filter(reservation::Column::TimeSpanId.eq(time_span_id))
        .filter(reservation::Column::StatusId.is_in(status_ids));
    if let Some(id) = exclude_reservation {
        query = query.filter(reservation::Column::Id.ne(id));
    }
    let row: Option<(i64, Option<i64>)> = query.into_tuple().one(conn).await.map_err(db_err)?;
    let (reservations, seats) = row.unwrap_or((0, None));
    Ok(Occupancy::new(reservations, seats.unwrap_or(0)))
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert(&self, new: NewReservation, policy: CapacityPolicy) -> DomainResult<Reservation> {
        debug!(
            "Inserting reservation: customer={} time_span={} count={}",
            new.customer_id, new.time_span_id, new.count
        );
        let ids = self.statuses.load().await?;
        let txn = self.db.begin().await.map_err(db_err)?;

        if policy.enforce {
            let span = lock_time_span(&txn, new.time_span_id).await?;
            let held = occupancy_on(
                &txn,
                span.id,
                ids.ids_of(StatusPurpose::Held.statuses())?,
                None,
            )
            .await?;
            policy.check(span.id, span.place_count, held.with_reservation(new.count))?;
        }

        let model = reservation::ActiveModel {
            customer_id: Set(new.customer_id),
            time_span_id: Set(new.time_span_id),
            status_id: Set(ids.id_of(ReservationStatus::Waiting)?),
            count: Set(new.count),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(customer_write_err(new.customer_id))?;

        txn.commit().await.map_err(db_err)?;
        model_to_domain(model, ids)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let ids = self.statuses.load().await?;
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(|m| model_to_domain(m, ids)).transpose()
    }

    async fn update_count(
        &self,
        id: i32,
        owner: i32,
        count: i32,
        policy: CapacityPolicy,
    ) -> DomainResult<Option<Reservation>> {
        debug!("Updating reservation {} count to {}", id, count);
        let ids = self.statuses.load().await?;
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(existing) = reservation::Entity::find_by_id(id)
            .filter(reservation::Column::CustomerId.eq(owner))
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        if policy.enforce && count > existing.count {
            let span = lock_time_span(&txn, existing.time_span_id).await?;
            let others = occupancy_on(
                &txn,
                span.id,
                ids.ids_of(StatusPurpose::Held.statuses())?,
                Some(existing.id),
            )
            .await?;
            policy.check(span.id, span.place_count, others.with_reservation(count))?;
        }

        let mut active: reservation::ActiveModel = existing.into();
        active.count = Set(count);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        model_to_domain(updated, ids).map(Some)
    }

    async fn delete_owned(&self, id: i32, owner: i32) -> DomainResult<bool> {
        debug!("Deleting reservation {} of customer {}", id, owner);
        let result = reservation::Entity::delete_many()
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::CustomerId.eq(owner))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn transition_status(
        &self,
        requested: &[i32],
        owner: Option<i32>,
        transition: StatusTransition,
    ) -> DomainResult<StatusUpdateOutcome> {
        if requested.is_empty() {
            return Ok(StatusUpdateOutcome::default());
        }
        debug!(
            "Transitioning {} reservations to {} (owner={:?})",
            requested.len(),
            transition.to,
            owner
        );
        let ids = self.statuses.load().await?;
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut query = reservation::Entity::find()
            .select_only()
            .column(reservation::Column::Id)
            .column(reservation::Column::StatusId)
            .filter(reservation::Column::Id.is_in(requested.to_vec()));
        if let Some(owner) = owner {
            query = query.filter(reservation::Column::CustomerId.eq(owner));
        }
        if txn.get_database_backend() != DbBackend::Sqlite {
            query = query.lock_exclusive();
        }
        let rows: Vec<(i32, i32)> = query.into_tuple().all(&txn).await.map_err(db_err)?;
        let current = rows
            .into_iter()
            .map(|(id, status_id)| Ok((id, ids.status_of(status_id)?)))
            .collect::<DomainResult<Vec<_>>>()?;

        let outcome = StatusUpdateOutcome::partition(requested, &current, &transition);
        if !outcome.updated.is_empty() {
            reservation::Entity::update_many()
                .col_expr(
                    reservation::Column::StatusId,
                    Expr::value(ids.id_of(transition.to)?),
                )
                .filter(reservation::Column::Id.is_in(outcome.updated.clone()))
                .filter(reservation::Column::StatusId.is_in(ids.ids_of(transition.from)?))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(outcome)
    }

    async fn list_for_customer(
        &self,
        customer_id: i32,
        statuses: Option<&[ReservationStatus]>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Reservation>> {
        let ids = self.statuses.load().await?;
        let mut query =
            reservation::Entity::find().filter(reservation::Column::CustomerId.eq(customer_id));
        if let Some(statuses) = statuses {
            query = query.filter(reservation::Column::StatusId.is_in(ids.ids_of(statuses)?));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .order_by_asc(reservation::Column::Id)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models
            .into_iter()
            .map(|m| model_to_domain(m, ids))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn count_for_customer(
        &self,
        customer_id: i32,
        statuses: Option<&[ReservationStatus]>,
    ) -> DomainResult<u64> {
        let mut query =
            reservation::Entity::find().filter(reservation::Column::CustomerId.eq(customer_id));
        if let Some(statuses) = statuses {
            let ids = self.statuses.load().await?;
            query = query.filter(reservation::Column::StatusId.is_in(ids.ids_of(statuses)?));
        }
        query.count(&self.db).await.map_err(db_err)
    }

    async fn occupancy(
        &self,
        time_span_id: i32,
        statuses: &[ReservationStatus],
    ) -> DomainResult<Occupancy> {
        let ids = self.statuses.load().await?;
        occupancy_on(&self.db, time_span_id, ids.ids_of(statuses)?, None).await
    }

    async fn find_ids_departed_before(
        &self,
        now: DateTime<Utc>,
        statuses: &[ReservationStatus],
    ) -> DomainResult<Vec<i32>> {
        let ids = self.statuses.load().await?;
        reservation::Entity::find()
            .select_only()
            .column(reservation::Column::Id)
            .inner_join(tour_time_span::Entity)
            .filter(tour_time_span::Column::DateTo.lt(now))
            .filter(reservation::Column::StatusId.is_in(ids.ids_of(statuses)?))
            .order_by_asc(reservation::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}
