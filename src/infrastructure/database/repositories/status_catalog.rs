//! Lookup between [`ReservationStatus`] and the seeded `reservation_statuses` ids

use std::collections::HashMap;

use log::debug;
use sea_orm::{DatabaseConnection, EntityTrait};
use tokio::sync::OnceCell;

use super::db_err;
use crate::domain::reservation::ReservationStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation_status;

#[derive(Debug, Default)]
pub struct StatusIds {
    by_status: HashMap<ReservationStatus, i32>,
    by_id: HashMap<i32, ReservationStatus>,
}

impl StatusIds {
    pub fn from_rows(rows: impl IntoIterator<Item = (i32, String)>) -> Self {
        let mut ids = Self::default();
        for (id, code) in rows {
            if let Some(status) = ReservationStatus::parse(&code) {
                ids.by_status.insert(status, id);
                ids.by_id.insert(id, status);
            }
        }
        ids
    }

    pub fn id_of(&self, status: ReservationStatus) -> DomainResult<i32> {
        self.by_status.get(&status).copied().ok_or_else(|| {
            DomainError::Storage(format!("reservation status '{}' is not seeded", status))
        })
    }

    pub fn ids_of(&self, statuses: &[ReservationStatus]) -> DomainResult<Vec<i32>> {
        statuses.iter().map(|s| self.id_of(*s)).collect()
    }

    pub fn status_of(&self, id: i32) -> DomainResult<ReservationStatus> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or_else(|| DomainError::Storage(format!("unknown reservation status id {}", id)))
    }
}

/// Loaded once per process on first use. The table is seeded by migration
/// and never changes afterwards.
pub struct StatusCatalog {
    db: DatabaseConnection,
    ids: OnceCell<StatusIds>,
}

impl StatusCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            ids: OnceCell::new(),
        }
    }

    pub async fn load(&self) -> DomainResult<&StatusIds> {
        self.ids
            .get_or_try_init(|| async {
                let rows = reservation_status::Entity::find()
                    .all(&self.db)
                    .await
                    .map_err(db_err)?;
                debug!("Loaded {} reservation statuses", rows.len());
                Ok::<_, DomainError>(StatusIds::from_rows(
                    rows.into_iter().map(|r| (r.id, r.status)),
                ))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_both_directions_and_skips_unknown_codes() {
        let ids = StatusIds::from_rows(vec![
            (1, "paid".to_string()),
            (4, "waiting".to_string()),
            (9, "archived".to_string()),
        ]);
        assert_eq!(ids.id_of(ReservationStatus::Waiting).unwrap(), 4);
        assert_eq!(ids.status_of(1).unwrap(), ReservationStatus::Paid);
        assert!(ids.status_of(9).is_err());
        assert!(ids.ids_of(&[ReservationStatus::Paid, ReservationStatus::Moved]).is_err());
    }
}
