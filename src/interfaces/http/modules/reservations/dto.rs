//! Reservation DTOs
//!
//! All instants cross the wire as ISO-8601 with explicit offset.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Customer, Reservation};

/// Guest contact details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerDto {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Self {
            name: dto.name,
            phone: dto.phone,
            email: dto.email,
        }
    }
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            name: c.name,
            phone: c.phone,
            email: c.email,
        }
    }
}

/// Request body of POST /reservations
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub restaurant_id: String,
    pub sector_id: String,
    pub party_size: u32,
    /// ISO-8601 instant with explicit offset
    pub start_date_time: String,
    pub customer: CustomerDto,
    pub notes: Option<String>,
}

/// Request body of PATCH /reservations/{id}; unset fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub sector_id: Option<String>,
    pub party_size: Option<u32>,
    pub start_date_time: Option<String>,
    pub customer: Option<CustomerDto>,
    pub notes: Option<String>,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: String,
    pub restaurant_id: String,
    pub sector_id: String,
    pub table_ids: Vec<String>,
    pub party_size: u32,
    pub start_date_time: String,
    pub end_date_time: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub customer: CustomerDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            restaurant_id: r.restaurant_id,
            sector_id: r.sector_id,
            table_ids: r.table_ids,
            party_size: r.party_size,
            start_date_time: r.start.to_rfc3339(),
            end_date_time: r.end.to_rfc3339(),
            status: r.status.as_str().to_string(),
            expires_at: r.expires_at.map(|at| at.to_rfc3339()),
            customer: CustomerDto::from(r.customer),
            notes: r.notes,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters of GET /reservations/day
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DayViewQuery {
    pub restaurant_id: String,
    /// Local calendar date, YYYY-MM-DD
    pub date: String,
    pub sector_id: Option<String>,
}

/// Response of GET /reservations/day
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayViewResponse {
    pub date: String,
    pub items: Vec<ReservationDto>,
}

/// Response of POST /reservations/expire-pending
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpireResponse {
    pub expired_count: usize,
}
