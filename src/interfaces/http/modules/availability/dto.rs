//! Availability DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::availability::{DayAvailability, SlotReport};

/// Query parameters of GET /availability
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub restaurant_id: String,
    pub sector_id: String,
    /// Local calendar date, YYYY-MM-DD
    pub date: String,
    pub party_size: u32,
}

/// One slot of the availability report
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    /// Canonical UTC instant (trailing Z)
    pub start: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response of GET /availability
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub slot_minutes: i64,
    pub duration_minutes: i64,
    pub slots: Vec<SlotDto>,
}

impl From<SlotReport> for SlotDto {
    fn from(slot: SlotReport) -> Self {
        Self {
            start: slot
                .start
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            available: slot.available,
            tables: slot.tables,
            reason: slot.reason.map(str::to_string),
        }
    }
}

impl From<DayAvailability> for AvailabilityResponse {
    fn from(day: DayAvailability) -> Self {
        Self {
            slot_minutes: day.slot_minutes,
            duration_minutes: day.duration_minutes,
            slots: day.slots.into_iter().map(SlotDto::from).collect(),
        }
    }
}
