//! Table assignment
//!
//! Two tiers: Best-Fit over single tables, then a bounded combinatorial
//! search across the sector. Pure functions over pre-loaded reservations;
//! the write path calls them under the slot locks with one overlap query,
//! the availability path reuses them against the whole pre-loaded day.

use chrono::{DateTime, Utc};

use crate::domain::{Reservation, Table};

/// Upper bound on tables joined into one combination. `C(n, 5)` keeps the
/// enumeration tractable for realistic sector sizes.
pub const DEFAULT_MAX_COMBINATION_TABLES: usize = 5;

/// Whether a table is free of conflicting active reservations over
/// `[start, end)`, ignoring `exclude_id` (self-overlap on updates).
fn is_free(
    table_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Reservation],
    exclude_id: Option<&str>,
) -> bool {
    !existing.iter().any(|r| {
        exclude_id != Some(r.id.as_str())
            && r.is_active()
            && r.overlaps(start, end)
            && r.table_ids.iter().any(|t| t == table_id)
    })
}

/// Eligible single tables free over the interval, tightest fit first
/// (smallest `max_size - party_size`, ties broken by id).
pub fn free_single_tables<'a>(
    tables: &'a [Table],
    party_size: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Reservation],
    exclude_id: Option<&str>,
) -> Vec<&'a Table> {
    let mut eligible: Vec<&Table> = tables
        .iter()
        .filter(|t| t.is_eligible(party_size))
        .filter(|t| is_free(&t.id, start, end, existing, exclude_id))
        .collect();
    eligible.sort_by(|a, b| {
        (a.max_size - party_size)
            .cmp(&(b.max_size - party_size))
            .then_with(|| a.id.cmp(&b.id))
    });
    eligible
}

/// Bounded combination search (tier two).
///
/// Candidates are every table the party clears the minimum of, sorted by
/// descending `max_size` then id; k-subsets are enumerated in
/// lexicographic order over that candidate order for k = 2..=`max_k`. A
/// subset is accepted iff `Σ min_size ≤ party ≤ Σ max_size` and every
/// member is free. The winning subset is returned sorted by id.
pub fn find_combination(
    tables: &[Table],
    party_size: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Reservation],
    exclude_id: Option<&str>,
    max_k: usize,
) -> Option<Vec<String>> {
    let mut candidates: Vec<&Table> = tables.iter().filter(|t| t.can_join(party_size)).collect();
    candidates.sort_by(|a, b| b.max_size.cmp(&a.max_size).then_with(|| a.id.cmp(&b.id)));

    for k in 2..=max_k.min(candidates.len()) {
        for indices in Combinations::new(candidates.len(), k) {
            let subset: Vec<&Table> = indices.iter().map(|&i| candidates[i]).collect();
            let sum_min: u32 = subset.iter().map(|t| t.min_size).sum();
            let sum_max: u32 = subset.iter().map(|t| t.max_size).sum();
            if sum_min > party_size || party_size > sum_max {
                continue;
            }
            if !subset
                .iter()
                .all(|t| is_free(&t.id, start, end, existing, exclude_id))
            {
                continue;
            }
            let mut ids: Vec<String> = subset.iter().map(|t| t.id.clone()).collect();
            ids.sort();
            return Some(ids);
        }
    }
    None
}

/// Full assignment: Best-Fit single table, then combinations.
pub fn find_tables(
    tables: &[Table],
    party_size: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &[Reservation],
    exclude_id: Option<&str>,
    max_k: usize,
) -> Option<Vec<String>> {
    if let Some(best) = free_single_tables(tables, party_size, start, end, existing, exclude_id)
        .first()
    {
        return Some(vec![best.id.clone()]);
    }
    find_combination(tables, party_size, start, end, existing, exclude_id, max_k)
}

/// Lexicographic k-subset index enumerator.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        let k = self.indices.len();

        // Advance to the next combination in lexicographic order
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] != i + self.n - k {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }
        Some(current)
    }
}

// ── Tests ──────────────────────────────────────────────────────
