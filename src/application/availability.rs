//! Per-slot availability reports
//!
//! Read path of the engine: one store query loads the whole local day,
//! every slot's feasibility is then decided in memory against that list.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::application::{assignment, scheduling};
use crate::config::BookingConfig;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Restaurant, Sector};

/// Feasibility of one 15-minute slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReport {
    pub start: DateTime<Utc>,
    pub available: bool,
    /// Free single tables (best-fit order) or the found combination
    pub tables: Option<Vec<String>>,
    pub reason: Option<&'static str>,
}

/// Availability of a sector over one local calendar day
#[derive(Debug, Clone)]
pub struct DayAvailability {
    pub slot_minutes: i64,
    pub duration_minutes: i64,
    pub slots: Vec<SlotReport>,
}

/// Computes per-slot feasibility reports for a day.
pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    booking: BookingConfig,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, booking: BookingConfig) -> Self {
        Self { repos, booking }
    }

    async fn resolve(
        &self,
        restaurant_id: &str,
        sector_id: &str,
    ) -> DomainResult<(Restaurant, Sector)> {
        let restaurant = self
            .repos
            .restaurants()
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", restaurant_id))?;
        let sector = self
            .repos
            .sectors()
            .find_by_id(sector_id)
            .await?
            .filter(|s| s.restaurant_id == restaurant.id)
            .ok_or_else(|| DomainError::not_found("Sector", sector_id))?;
        Ok((restaurant, sector))
    }

    /// Feasibility report for every future slot of the local day.
    pub async fn availability(
        &self,
        restaurant_id: &str,
        sector_id: &str,
        date: NaiveDate,
        party_size: u32,
    ) -> DomainResult<DayAvailability> {
        if party_size == 0 || party_size > self.booking.max_party_size {
            return Err(DomainError::InvalidFormat(format!(
                "party size must be between 1 and {}",
                self.booking.max_party_size
            )));
        }

        let (restaurant, sector) = self.resolve(restaurant_id, sector_id).await?;
        let tz = restaurant.tz()?;
        let tables = self.repos.sectors().tables_by_sector(&sector.id).await?;

        // One query returns the whole day; per-slot checks are in-memory
        let (day_start, _) = scheduling::day_bounds(date, tz);
        let existing = self
            .repos
            .reservations()
            .find_by_day(
                &restaurant.id,
                day_start,
                day_start + Duration::hours(24),
                Some(&sector.id),
            )
            .await?;

        // The grid is cut with the longest configured duration so a slot is
        // never offered whose longest reservation would outlive its shift
        let grid = scheduling::day_slots(
            date,
            tz,
            &restaurant.shifts,
            restaurant.max_duration_minutes(),
        );

        let duration_minutes = restaurant.duration_minutes_for(party_size);
        let duration = Duration::minutes(duration_minutes);
        let now = Utc::now();

        let mut slots = Vec::with_capacity(grid.len());
        for start in grid.into_iter().filter(|s| *s >= now) {
            let end = start + duration;

            let singles = assignment::free_single_tables(
                &tables, party_size, start, end, &existing, None,
            );
            if !singles.is_empty() {
                slots.push(SlotReport {
                    start,
                    available: true,
                    tables: Some(singles.into_iter().map(|t| t.id.clone()).collect()),
                    reason: None,
                });
                continue;
            }

            match assignment::find_combination(
                &tables,
                party_size,
                start,
                end,
                &existing,
                None,
                self.booking.max_combination_tables,
            ) {
                Some(combination) => slots.push(SlotReport {
                    start,
                    available: true,
                    tables: Some(combination),
                    reason: None,
                }),
                None => slots.push(SlotReport {
                    start,
                    available: false,
                    tables: None,
                    reason: Some("no_capacity"),
                }),
            }
        }

        Ok(DayAvailability {
            slot_minutes: scheduling::SLOT_MINUTES,
            duration_minutes,
            slots,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Customer, DurationRule, Reservation, ReservationStatus, Shift, Table,
    };
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use chrono::TimeZone;

    async fn seeded() -> (Arc<InMemoryRepositoryProvider>, AvailabilityService) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());

        let restaurant = Restaurant {
            id: "r1".into(),
            name: "La Parrilla".into(),
            timezone: "America/Argentina/Buenos_Aires".into(),
            shifts: vec![
                Shift::new("12:00", "16:00").unwrap(),
                Shift::new("20:00", "23:45").unwrap(),
            ],
            default_duration_minutes: 90,
            duration_rules: vec![
                DurationRule { max_party_size: 2, duration_minutes: 75 },
                DurationRule { max_party_size: 4, duration_minutes: 90 },
                DurationRule { max_party_size: 8, duration_minutes: 120 },
                DurationRule { max_party_size: 999, duration_minutes: 150 },
            ],
            advance_policy: None,
            large_group_threshold: Some(8),
            pending_hold_ttl_minutes: Some(30),
            max_guests_per_slot: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repos.restaurants().save(restaurant).await.unwrap();

        repos
            .sectors()
            .save_sector(crate::domain::Sector {
                id: "s1".into(),
                restaurant_id: "r1".into(),
                name: "Main Hall".into(),
            })
            .await
            .unwrap();
        repos
            .sectors()
            .save_table(Table::new("t1", "s1", 2, 4).unwrap())
            .await
            .unwrap();
        repos
            .sectors()
            .save_table(Table::new("t2", "s1", 2, 4).unwrap())
            .await
            .unwrap();

        let service = AvailabilityService::new(repos.clone(), BookingConfig::default());
        (repos, service)
    }

    fn future_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2031, 9, 8).unwrap()
    }

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        // Buenos Aires is UTC-3 year-round
        Utc.with_ymd_and_hms(2031, 9, 8, h + 3, m, 0).unwrap()
    }

    fn booking(id: &str, tables: &[&str], start: DateTime<Utc>, minutes: i64) -> Reservation {
        Reservation {
            id: id.into(),
            restaurant_id: "r1".into(),
            sector_id: "s1".into(),
            table_ids: tables.iter().map(|t| t.to_string()).collect(),
            party_size: 2,
            start,
            end: start + Duration::minutes(minutes),
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

    #[tokio::test]
    async fn empty_day_reports_every_slot_available() {
        let (_, service) = seeded().await;
        let report = service.availability("r1", "s1", future_date(), 2).await.unwrap();

        assert_eq!(report.slot_minutes, 15);
        assert_eq!(report.duration_minutes, 75);
        // Lunch: 12:00..13:30 (max duration 150), dinner: 20:00..21:15
        assert_eq!(report.slots.len(), 13);
        assert!(report.slots.iter().all(|s| s.available));
        assert!(report.slots.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[tokio::test]
    async fn booked_tables_drop_out_per_slot() {
        let (repos, service) = seeded().await;
        // t1 taken 20:00-21:15 local
        repos
            .reservations()
            .create(booking("res-a", &["t1"], local(20, 0), 75))
            .await
            .unwrap();

        let report = service.availability("r1", "s1", future_date(), 2).await.unwrap();
        let slot = report
            .slots
            .iter()
            .find(|s| s.start == local(20, 0))
            .unwrap();
        assert!(slot.available);
        assert_eq!(slot.tables, Some(vec!["t2".into()]));
    }

    #[tokio::test]
    async fn fully_booked_slot_reports_no_capacity() {
        let (repos, service) = seeded().await;
        repos
            .reservations()
            .create(booking("res-a", &["t1"], local(20, 0), 75))
            .await
            .unwrap();
        repos
            .reservations()
            .create(booking("res-b", &["t2"], local(20, 0), 75))
            .await
            .unwrap();

        let report = service.availability("r1", "s1", future_date(), 2).await.unwrap();
        let slot = report
            .slots
            .iter()
            .find(|s| s.start == local(20, 0))
            .unwrap();
        assert!(!slot.available);
        assert_eq!(slot.reason, Some("no_capacity"));
        assert!(slot.tables.is_none());
    }

    #[tokio::test]
    async fn large_party_gets_combination() {
        let (_, service) = seeded().await;
        let report = service.availability("r1", "s1", future_date(), 8).await.unwrap();
        assert_eq!(report.duration_minutes, 120);
        let slot = report
            .slots
            .iter()
            .find(|s| s.start == local(20, 0))
            .unwrap();
        assert!(slot.available);
        assert_eq!(slot.tables, Some(vec!["t1".into(), "t2".into()]));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (_, service) = seeded().await;
        let err = service
            .availability("nope", "s1", future_date(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = service
            .availability("r1", "nope", future_date(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn party_size_bounds_are_validated() {
        let (_, service) = seeded().await;
        assert!(service
            .availability("r1", "s1", future_date(), 0)
            .await
            .is_err());
        assert!(service
            .availability("r1", "s1", future_date(), 21)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn past_days_have_no_slots() {
        let (_, service) = seeded().await;
        let yesterday = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let report = service.availability("r1", "s1", yesterday, 2).await.unwrap();
        assert!(report.slots.is_empty());
    }
}
