//! Availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;

use crate::application::AvailabilityService;
use crate::interfaces::http::error::{ApiError, ErrorBody};

use super::dto::*;

/// Application state for availability handlers.
#[derive(Clone)]
pub struct AvailabilityAppState {
    pub availability: Arc<AvailabilityService>,
}

#[utoipa::path(
    get,
    path = "/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Per-slot feasibility report", body = AvailabilityResponse),
        (status = 400, description = "Malformed query", body = ErrorBody),
        (status = 404, description = "Unknown restaurant or sector", body = ErrorBody)
    )
)]
pub async fn get_availability(
    State(state): State<AvailabilityAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::invalid(format!("invalid date '{}', expected YYYY-MM-DD", query.date)))?;

    let report = state
        .availability
        .availability(&query.restaurant_id, &query.sector_id, date, query.party_size)
        .await?;

    Ok(Json(AvailabilityResponse::from(report)))
}
