//! Reservation DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// New number of places for an existing reservation
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCountRequest {
    #[validate(range(min = 1))]
    pub count: i32,
}

/// Reservations to pay for in one go
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PayRequest {
    #[validate(length(min = 1))]
    pub ids: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingCountResponse {
    pub count: u64,
}
