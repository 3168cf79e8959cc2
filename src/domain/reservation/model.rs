//! Reservation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Booked and counted against table capacity
    Confirmed,
    /// Large-group hold awaiting approval; expires at `expires_at`
    Pending,
    /// Cancelled, rejected or expired; terminal
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Pending => "PENDING",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "CONFIRMED" => Self::Confirmed,
            "PENDING" => Self::Pending,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guest contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// A booking of one or more tables over a half-open interval `[start, end)`
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: String,
    pub restaurant_id: String,
    pub sector_id: String,
    /// Tables occupied by this booking; more than one for combinations
    pub table_ids: Vec<String>,
    pub party_size: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Set iff status is `Pending`
    pub expires_at: Option<DateTime<Utc>>,
    pub customer: Customer,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Active reservations occupy their tables and count against caps.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Confirmed | ReservationStatus::Pending
        )
    }

    /// Strict interval overlap against another half-open interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Whether this booking occupies any of the given tables.
    pub fn shares_any_table(&self, table_ids: &[String]) -> bool {
        self.table_ids.iter().any(|t| table_ids.contains(t))
    }

    /// A pending hold whose TTL has elapsed.
    pub fn is_hold_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Pending
            && self.expires_at.is_some_and(|at| at < now)
    }

    /// Cancel this reservation; clears the hold expiry.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = ReservationStatus::Cancelled;
        self.expires_at = None;
        self.updated_at = now;
    }

    /// Approve a pending hold.
    pub fn approve(&mut self, now: DateTime<Utc>) {
        self.status = ReservationStatus::Confirmed;
        self.expires_at = None;
        self.updated_at = now;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 9, 8, hour, min, 0).unwrap()
    }

    fn sample(start: DateTime<Utc>, end: DateTime<Utc>, tables: &[&str]) -> Reservation {
        Reservation {
            id: "res-1".into(),
            restaurant_id: "r1".into(),
            sector_id: "s1".into(),
            table_ids: tables.iter().map(|t| t.to_string()).collect(),
            party_size: 2,
            start,
            end,
            status: ReservationStatus::Confirmed,
            expires_at: None,
            customer: Customer {
                name: "Ana".into(),
                phone: "+54 11 5555-0001".into(),
                email: "ana@example.com".into(),
            },
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        let r = sample(at(20, 0), at(21, 15), &["t1"]);
        assert!(!r.overlaps(at(21, 15), at(22, 30)));
        assert!(!r.overlaps(at(18, 45), at(20, 0)));
    }

    #[test]
    fn any_positive_overlap_is_detected() {
        let r = sample(at(20, 0), at(21, 15), &["t1"]);
        assert!(r.overlaps(at(21, 0), at(22, 15)));
        assert!(r.overlaps(at(19, 0), at(20, 15)));
        assert!(r.overlaps(at(20, 15), at(21, 0)));
    }

    #[test]
    fn table_sharing_checks_intersection() {
        let r = sample(at(20, 0), at(21, 15), &["t1", "t2"]);
        assert!(r.shares_any_table(&["t2".into(), "t9".into()]));
        assert!(!r.shares_any_table(&["t3".into()]));
    }

    #[test]
    fn cancel_clears_expiry_and_is_terminal() {
        let mut r = sample(at(20, 0), at(21, 15), &["t1"]);
        r.status = ReservationStatus::Pending;
        r.expires_at = Some(Utc::now() + Duration::minutes(30));
        r.cancel(Utc::now());
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert!(r.expires_at.is_none());
        assert!(!r.is_active());
    }

    #[test]
    fn approve_confirms_and_clears_expiry() {
        let mut r = sample(at(20, 0), at(21, 15), &["t1"]);
        r.status = ReservationStatus::Pending;
        r.expires_at = Some(Utc::now() + Duration::minutes(30));
        r.approve(Utc::now());
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.expires_at.is_none());
    }

    #[test]
    fn hold_expiry_only_applies_to_pending() {
        let now = Utc::now();
        let mut r = sample(at(20, 0), at(21, 15), &["t1"]);
        r.status = ReservationStatus::Pending;
        r.expires_at = Some(now - Duration::minutes(1));
        assert!(r.is_hold_expired(now));

        r.status = ReservationStatus::Confirmed;
        assert!(!r.is_hold_expired(now));
    }

    #[test]
    fn status_string_roundtrip() {
        for status in &[
            ReservationStatus::Confirmed,
            ReservationStatus::Pending,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(&ReservationStatus::from_str(status.as_str()), status);
        }
        assert_eq!(
            ReservationStatus::from_str("garbage"),
            ReservationStatus::Cancelled
        );
    }
}
