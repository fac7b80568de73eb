//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub customer_id: i32,
    pub time_span_id: i32,

    /// FK to reservation_statuses
    pub status_id: i32,

    pub count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::tour_time_span::Entity",
        from = "Column::TimeSpanId",
        to = "super::tour_time_span::Column::Id"
    )]
    TimeSpan,
    #[sea_orm(
        belongs_to = "super::reservation_status::Entity",
        from = "Column::StatusId",
        to = "super::reservation_status::Column::Id"
    )]
    Status,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::tour_time_span::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeSpan.def()
    }
}

impl Related<super::reservation_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
