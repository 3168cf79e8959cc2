//! Reservation HTTP handlers
//!
//! Create and update honor the optional `Idempotency-Key` header: a hit
//! replays the cached response verbatim, a successful (2xx) outcome is
//! cached via conditional insert before the response leaves the handler.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};

use crate::application::idempotency::StoredResponse;
use crate::application::{
    IdempotencyService, NewReservation, ReservationPatch, ReservationService,
};
use crate::interfaces::http::error::{ApiError, ErrorBody};

use super::dto::*;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationsAppState {
    pub reservations: Arc<ReservationService>,
    pub idempotency: Arc<IdempotencyService>,
}

fn idempotency_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ApiError::invalid(format!(
                "invalid instant '{}', expected ISO-8601 with offset",
                s
            ))
        })
}

fn parse_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::invalid(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}

fn replay(stored: StoredResponse) -> Response {
    let status = StatusCode::from_u16(stored.status_code).unwrap_or(StatusCode::OK);
    (status, Json(stored.payload)).into_response()
}

/// Cache a successful response under the key (when present) and emit
/// whichever record won; losers of a key race answer with the earlier
/// response.
async fn respond_cached(
    state: &ReservationsAppState,
    key: Option<String>,
    status: StatusCode,
    dto: ReservationDto,
) -> Result<Response, ApiError> {
    let payload = serde_json::to_value(&dto)
        .map_err(|e| ApiError::internal(format!("response serialization failed: {}", e)))?;
    let stored = match key {
        Some(key) => state.idempotency.store(&key, status.as_u16(), payload).await?,
        None => StoredResponse {
            status_code: status.as_u16(),
            payload,
        },
    };
    Ok(replay(stored))
}

#[utoipa::path(
    post,
    path = "/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationDto),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Unknown restaurant or sector", body = ErrorBody),
        (status = 409, description = "No capacity", body = ErrorBody),
        (status = 422, description = "Outside service window", body = ErrorBody)
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationsAppState>,
    headers: HeaderMap,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Response, ApiError> {
    let key = idempotency_key(&headers);
    if let Some(key) = &key {
        if let Some(cached) = state.idempotency.lookup(key).await? {
            return Ok(replay(cached));
        }
    }

    let start = parse_instant(&request.start_date_time)?;
    let reservation = state
        .reservations
        .create(NewReservation {
            restaurant_id: request.restaurant_id,
            sector_id: request.sector_id,
            party_size: request.party_size,
            start,
            customer: request.customer.into(),
            notes: request.notes,
        })
        .await?;

    respond_cached(&state, key, StatusCode::CREATED, reservation.into()).await
}

#[utoipa::path(
    patch,
    path = "/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ReservationDto),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Unknown reservation", body = ErrorBody),
        (status = 409, description = "No capacity", body = ErrorBody),
        (status = 422, description = "Outside service window", body = ErrorBody)
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationsAppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Response, ApiError> {
    let key = idempotency_key(&headers);
    if let Some(key) = &key {
        if let Some(cached) = state.idempotency.lookup(key).await? {
            return Ok(replay(cached));
        }
    }

    let start = request
        .start_date_time
        .as_deref()
        .map(parse_instant)
        .transpose()?;
    let reservation = state
        .reservations
        .update(
            &id,
            ReservationPatch {
                sector_id: request.sector_id,
                party_size: request.party_size,
                start,
                customer: request.customer.map(Into::into),
                notes: request.notes,
            },
        )
        .await?;

    respond_cached(&state, key, StatusCode::OK, reservation.into()).await
}

#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 404, description = "Unknown reservation", body = ErrorBody)
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationsAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.reservations.cancel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/reservations/day",
    tag = "Reservations",
    params(DayViewQuery),
    responses(
        (status = 200, description = "Reservations of the local day", body = DayViewResponse),
        (status = 400, description = "Malformed query", body = ErrorBody),
        (status = 404, description = "Unknown restaurant or sector", body = ErrorBody)
    )
)]
pub async fn day_view(
    State(state): State<ReservationsAppState>,
    Query(query): Query<DayViewQuery>,
) -> Result<Json<DayViewResponse>, ApiError> {
    let date = parse_date(&query.date)?;
    let items = state
        .reservations
        .day_view(&query.restaurant_id, date, query.sector_id.as_deref())
        .await?;

    Ok(Json(DayViewResponse {
        date: query.date,
        items: items.into_iter().map(ReservationDto::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/reservations/{id}/approve",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Hold approved", body = ReservationDto),
        (status = 400, description = "Not a pending hold", body = ErrorBody),
        (status = 404, description = "Unknown reservation", body = ErrorBody),
        (status = 409, description = "Hold already expired", body = ErrorBody)
    )
)]
pub async fn approve_reservation(
    State(state): State<ReservationsAppState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationDto>, ApiError> {
    let reservation = state.reservations.approve(&id).await?;
    Ok(Json(reservation.into()))
}

#[utoipa::path(
    post,
    path = "/reservations/{id}/reject",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Hold rejected", body = ReservationDto),
        (status = 400, description = "Not a pending hold", body = ErrorBody),
        (status = 404, description = "Unknown reservation", body = ErrorBody)
    )
)]
pub async fn reject_reservation(
    State(state): State<ReservationsAppState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationDto>, ApiError> {
    let reservation = state.reservations.reject(&id).await?;
    Ok(Json(reservation.into()))
}

#[utoipa::path(
    post,
    path = "/reservations/expire-pending",
    tag = "Reservations",
    responses(
        (status = 200, description = "Sweep result", body = ExpireResponse)
    )
)]
pub async fn expire_pending(
    State(state): State<ReservationsAppState>,
) -> Result<Json<ExpireResponse>, ApiError> {
    let expired_count = state.reservations.expire_pending().await?;
    Ok(Json(ExpireResponse { expired_count }))
}
