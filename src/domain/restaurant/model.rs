//! Restaurant domain entity
//!
//! The restaurant is the configuration anchor of the engine: timezone,
//! service shifts, duration rules, advance-booking policy and capacity
//! settings all hang off it. Created externally (seeding/admin) and
//! effectively immutable from the engine's perspective.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// A service window in local wall-clock time, half-open `[start, end)`.
///
/// Boundaries are zero-padded `"HH:MM"` strings, so lexicographic order is
/// chronological order. Shifts spanning midnight are rejected; model them
/// as two shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub start: String,
    pub end: String,
}

impl Shift {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> DomainResult<Self> {
        let shift = Self {
            start: start.into(),
            end: end.into(),
        };
        shift.validate()?;
        Ok(shift)
    }

    pub fn validate(&self) -> DomainResult<()> {
        let start = parse_hhmm(&self.start).ok_or_else(|| {
            DomainError::InvalidFormat(format!("invalid shift start '{}'", self.start))
        })?;
        let end = parse_hhmm(&self.end).ok_or_else(|| {
            DomainError::InvalidFormat(format!("invalid shift end '{}'", self.end))
        })?;
        if start >= end {
            return Err(DomainError::InvalidFormat(format!(
                "shift start '{}' must be before end '{}'",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// `(start, end)` as minutes since local midnight, `None` for a shift
    /// that never passed validation.
    pub fn window(&self) -> Option<(u32, u32)> {
        match (parse_hhmm(&self.start), parse_hhmm(&self.end)) {
            (Some(s), Some(e)) if s < e => Some((s, e)),
            _ => None,
        }
    }
}

/// Parse a zero-padded `"HH:MM"` string into minutes since midnight.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Maps a party size to a reservation duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRule {
    /// Largest party size this rule applies to (inclusive)
    pub max_party_size: u32,
    pub duration_minutes: i64,
}

/// How far in advance a reservation may be placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceBookingPolicy {
    pub min_advance_minutes: Option<i64>,
    pub max_advance_days: Option<i64>,
}

/// Restaurant configuration
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// IANA timezone name, e.g. `America/Argentina/Buenos_Aires`
    pub timezone: String,
    /// Service shifts; empty means the restaurant operates 24h
    pub shifts: Vec<Shift>,
    pub default_duration_minutes: i64,
    pub duration_rules: Vec<DurationRule>,
    pub advance_policy: Option<AdvanceBookingPolicy>,
    /// Party size at or above which a reservation needs approval
    pub large_group_threshold: Option<u32>,
    /// TTL of unapproved large-group holds
    pub pending_hold_ttl_minutes: Option<i64>,
    /// Restaurant-wide cap on concurrent guests per 15-minute slot
    pub max_guests_per_slot: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Resolve the IANA timezone name.
    pub fn tz(&self) -> DomainResult<Tz> {
        self.timezone.parse().map_err(|_| {
            DomainError::InvalidFormat(format!("invalid timezone '{}'", self.timezone))
        })
    }

    /// Duration for a party: rules are scanned in ascending `max_party_size`
    /// and the first rule covering the party wins; a party beyond every
    /// threshold takes the largest rule; no rules means the default.
    pub fn duration_minutes_for(&self, party_size: u32) -> i64 {
        if self.duration_rules.is_empty() {
            return self.default_duration_minutes;
        }
        let mut rules = self.duration_rules.clone();
        rules.sort_by_key(|r| r.max_party_size);
        for rule in &rules {
            if party_size <= rule.max_party_size {
                return rule.duration_minutes;
            }
        }
        // Past every threshold: the rule with the largest max_party_size
        rules[rules.len() - 1].duration_minutes
    }

    pub fn duration_for(&self, party_size: u32) -> Duration {
        Duration::minutes(self.duration_minutes_for(party_size))
    }

    /// Longest duration any party could be assigned; bounds slot generation
    /// so the longest reservation starting at a slot still fits its shift.
    pub fn max_duration_minutes(&self) -> i64 {
        self.duration_rules
            .iter()
            .map(|r| r.duration_minutes)
            .max()
            .unwrap_or(self.default_duration_minutes)
    }

    /// Validate the advance-booking policy for a requested start.
    ///
    /// `allow_past` disables the past-start rejection (test mode).
    pub fn check_advance(
        &self,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
        allow_past: bool,
    ) -> DomainResult<()> {
        if !allow_past && start < now {
            return Err(DomainError::InvalidFormat(
                "reservation start is in the past".into(),
            ));
        }
        let Some(policy) = &self.advance_policy else {
            return Ok(());
        };
        if let Some(min) = policy.min_advance_minutes {
            if start < now + Duration::minutes(min) {
                return Err(DomainError::InvalidFormat(format!(
                    "reservation must be placed at least {} minutes in advance",
                    min
                )));
            }
        }
        if let Some(max) = policy.max_advance_days {
            if start > now + Duration::days(max) {
                return Err(DomainError::InvalidFormat(format!(
                    "reservation cannot be placed more than {} days in advance",
                    max
                )));
            }
        }
        Ok(())
    }

    /// Sanity checks applied when a restaurant is saved.
    pub fn validate(&self) -> DomainResult<()> {
        self.tz()?;
        if self.default_duration_minutes <= 0 {
            return Err(DomainError::InvalidFormat(
                "default duration must be positive".into(),
            ));
        }
        for shift in &self.shifts {
            shift.validate()?;
        }
        for rule in &self.duration_rules {
            if rule.duration_minutes <= 0 {
                return Err(DomainError::InvalidFormat(format!(
                    "duration rule for party <= {} must be positive",
                    rule.max_party_size
                )));
            }
        }
        if self.pending_hold_ttl_minutes.is_some_and(|ttl| ttl <= 0) {
            return Err(DomainError::InvalidFormat(
                "pending hold TTL must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant_with_rules(rules: Vec<DurationRule>) -> Restaurant {
        Restaurant {
            id: "r1".into(),
            name: "Trattoria".into(),
            timezone: "America/Argentina/Buenos_Aires".into(),
            shifts: vec![],
            default_duration_minutes: 90,
            duration_rules: rules,
            advance_policy: None,
            large_group_threshold: None,
            pending_hold_ttl_minutes: None,
            max_guests_per_slot: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn standard_rules() -> Vec<DurationRule> {
        vec![
            DurationRule {
                max_party_size: 2,
                duration_minutes: 75,
            },
            DurationRule {
                max_party_size: 4,
                duration_minutes: 90,
            },
            DurationRule {
                max_party_size: 8,
                duration_minutes: 120,
            },
            DurationRule {
                max_party_size: 999,
                duration_minutes: 150,
            },
        ]
    }

    #[test]
    fn first_matching_rule_wins() {
        let r = restaurant_with_rules(standard_rules());
        assert_eq!(r.duration_minutes_for(1), 75);
        assert_eq!(r.duration_minutes_for(2), 75);
        assert_eq!(r.duration_minutes_for(3), 90);
        assert_eq!(r.duration_minutes_for(8), 120);
        assert_eq!(r.duration_minutes_for(9), 150);
    }

    #[test]
    fn party_beyond_all_thresholds_takes_largest_rule() {
        let r = restaurant_with_rules(vec![
            DurationRule {
                max_party_size: 2,
                duration_minutes: 60,
            },
            DurationRule {
                max_party_size: 6,
                duration_minutes: 120,
            },
        ]);
        assert_eq!(r.duration_minutes_for(20), 120);
    }

    #[test]
    fn empty_rules_fall_back_to_default() {
        let r = restaurant_with_rules(vec![]);
        assert_eq!(r.duration_minutes_for(4), 90);
        assert_eq!(r.max_duration_minutes(), 90);
    }

    #[test]
    fn rules_are_scanned_in_ascending_order_regardless_of_storage_order() {
        let mut rules = standard_rules();
        rules.reverse();
        let r = restaurant_with_rules(rules);
        assert_eq!(r.duration_minutes_for(2), 75);
    }

    #[test]
    fn max_duration_is_largest_rule_duration() {
        let r = restaurant_with_rules(standard_rules());
        assert_eq!(r.max_duration_minutes(), 150);
    }

    #[test]
    fn shift_rejects_inverted_window() {
        assert!(Shift::new("22:00", "02:00").is_err());
        assert!(Shift::new("12:00", "12:00").is_err());
        assert!(Shift::new("12:00", "16:00").is_ok());
    }

    #[test]
    fn shift_rejects_malformed_times() {
        assert!(Shift::new("9:00", "16:00").is_err());
        assert!(Shift::new("25:00", "26:00").is_err());
        assert!(Shift::new("12:61", "13:00").is_err());
        assert!(Shift::new("noon", "16:00").is_err());
    }

    #[test]
    fn parse_hhmm_minutes() {
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:45"), Some(23 * 60 + 45));
        assert_eq!(parse_hhmm("24:00"), None);
    }

    #[test]
    fn advance_policy_min_bound() {
        let mut r = restaurant_with_rules(vec![]);
        r.advance_policy = Some(AdvanceBookingPolicy {
            min_advance_minutes: Some(60),
            max_advance_days: None,
        });
        let now = Utc::now();
        assert!(r.check_advance(now + Duration::minutes(30), now, false).is_err());
        assert!(r.check_advance(now + Duration::minutes(61), now, false).is_ok());
    }

    #[test]
    fn advance_policy_max_bound() {
        let mut r = restaurant_with_rules(vec![]);
        r.advance_policy = Some(AdvanceBookingPolicy {
            min_advance_minutes: None,
            max_advance_days: Some(30),
        });
        let now = Utc::now();
        assert!(r.check_advance(now + Duration::days(31), now, false).is_err());
        assert!(r.check_advance(now + Duration::days(29), now, false).is_ok());
    }

    #[test]
    fn past_start_rejected_unless_allowed() {
        let r = restaurant_with_rules(vec![]);
        let now = Utc::now();
        let past = now - Duration::minutes(5);
        assert!(r.check_advance(past, now, false).is_err());
        assert!(r.check_advance(past, now, true).is_ok());
    }

    #[test]
    fn unset_policy_bounds_disable_checks() {
        let r = restaurant_with_rules(vec![]);
        let now = Utc::now();
        assert!(r.check_advance(now + Duration::days(365), now, false).is_ok());
    }

    #[test]
    fn validate_rejects_bad_timezone() {
        let mut r = restaurant_with_rules(vec![]);
        r.timezone = "Mars/Olympus_Mons".into();
        assert!(r.validate().is_err());
    }
}
