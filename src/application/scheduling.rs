//! Slot and shift calculus
//!
//! Generates the 15-minute reservation grid for a local calendar day and
//! answers shift-containment questions. All grid arithmetic happens on the
//! restaurant's local wall clock (minutes since local midnight) and is
//! resolved to absolute instants at the edges, so DST days of 23 or 25
//! hours fall out of the timezone resolution rather than special cases.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::domain::Shift;

/// Grid step and lock granularity
pub const SLOT_MINUTES: i64 = 15;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Resolve a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant; nonexistent
/// times (spring-forward gap) resolve to `None`.
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match naive.and_local_timezone(tz) {
        chrono::LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        chrono::LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        chrono::LocalResult::None => None,
    }
}

fn minutes_to_time(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// First valid instant of the local day. When midnight itself falls into a
/// DST gap the day starts at the first representable grid time after it.
fn local_day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut minutes = 0u32;
    while minutes < MINUTES_PER_DAY {
        if let Some(dt) = resolve_local(date.and_time(minutes_to_time(minutes)), tz) {
            return dt;
        }
        minutes += SLOT_MINUTES as u32;
    }
    // A day without a single valid wall-clock instant does not exist in tzdb
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// `[start, end)` of the local calendar day in absolute time. The span is
/// 24h except on DST transition days (23h or 25h).
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_day_start(date, tz), local_day_start(next, tz))
}

/// Shift windows as minutes since local midnight; an empty shift list means
/// the restaurant operates around the clock.
fn windows(shifts: &[Shift]) -> Vec<(u32, u32)> {
    if shifts.is_empty() {
        return vec![(0, MINUTES_PER_DAY)];
    }
    shifts.iter().filter_map(Shift::window).collect()
}

/// All 15-minute slot start instants of the local day that lie inside a
/// shift and leave room for the longest configured reservation before the
/// shift ends. Ascending, deduplicated.
pub fn day_slots(
    date: NaiveDate,
    tz: Tz,
    shifts: &[Shift],
    max_duration_minutes: i64,
) -> Vec<DateTime<Utc>> {
    let mut slots = Vec::new();
    for (start, end) in windows(shifts) {
        let mut t = start;
        while i64::from(t) + max_duration_minutes <= i64::from(end) {
            if let Some(instant) = resolve_local(date.and_time(minutes_to_time(t)), tz) {
                slots.push(instant);
            }
            t += SLOT_MINUTES as u32;
        }
    }
    slots.sort();
    slots.dedup();
    slots
}

/// Minutes since local midnight of an absolute instant.
fn local_minutes(t: DateTime<Utc>, tz: Tz) -> u32 {
    let local = t.with_timezone(&tz);
    local.hour() * 60 + local.minute()
}

/// Whether the instant's local wall-clock time falls inside some shift.
/// Vacuously true for a 24h restaurant.
pub fn within_shift(t: DateTime<Utc>, tz: Tz, shifts: &[Shift]) -> bool {
    if shifts.is_empty() {
        return true;
    }
    let m = local_minutes(t, tz);
    windows(shifts).iter().any(|&(s, e)| s <= m && m < e)
}

/// Whether a reservation starting at `start` and running for
/// `duration_minutes` begins inside a shift and ends by that same shift's
/// end. For a 24h restaurant the reservation must end by local midnight.
pub fn fits_in_shift(
    start: DateTime<Utc>,
    duration_minutes: i64,
    tz: Tz,
    shifts: &[Shift],
) -> bool {
    let m = i64::from(local_minutes(start, tz));
    windows(shifts)
        .iter()
        .any(|&(s, e)| i64::from(s) <= m && m < i64::from(e) && m + duration_minutes <= i64::from(e))
}

/// Whether the instant lies on the 15-minute grid. Timezone offsets are
/// all multiples of 15 minutes, so the epoch grid and every local grid
/// coincide; this makes slot lock keys canonical across writers.
pub fn is_slot_aligned(t: DateTime<Utc>) -> bool {
    t.timestamp().rem_euclid(SLOT_MINUTES * 60) == 0 && t.timestamp_subsec_nanos() == 0
}

/// 15-minute slot instants `s` with `start <= s < end`.
pub fn slot_instants(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut instants = Vec::new();
    let mut s = start;
    while s < end {
        instants.push(s);
        s += Duration::minutes(SLOT_MINUTES);
    }
    instants
}

// ── Tests ──────────────────────────────────────────────────────
