//! Sector and table domain entities

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Named, table-bearing subdivision of a restaurant (e.g. "Main Hall")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
}

/// Physical table within a sector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub sector_id: String,
    /// Smallest party this table is set for
    pub min_size: u32,
    /// Largest party this table seats
    pub max_size: u32,
}

impl Table {
    pub fn new(
        id: impl Into<String>,
        sector_id: impl Into<String>,
        min_size: u32,
        max_size: u32,
    ) -> DomainResult<Self> {
        let table = Self {
            id: id.into(),
            sector_id: sector_id.into(),
            min_size,
            max_size,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.min_size == 0 || self.min_size > self.max_size {
            return Err(DomainError::InvalidFormat(format!(
                "table {} capacity bounds {}..{} are invalid",
                self.id, self.min_size, self.max_size
            )));
        }
        Ok(())
    }

    /// A table seats a party on its own iff the size is inside its bounds.
    pub fn is_eligible(&self, party_size: u32) -> bool {
        self.min_size <= party_size && party_size <= self.max_size
    }

    /// A table can contribute to a combination iff the party clears its
    /// minimum, even when it is too small on its own.
    pub fn can_join(&self, party_size: u32) -> bool {
        self.min_size <= party_size
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_is_inclusive_on_both_bounds() {
        let t = Table::new("t1", "s1", 2, 4).unwrap();
        assert!(!t.is_eligible(1));
        assert!(t.is_eligible(2));
        assert!(t.is_eligible(4));
        assert!(!t.is_eligible(5));
    }

    #[test]
    fn combination_membership_only_needs_the_minimum() {
        let t = Table::new("t1", "s1", 2, 4).unwrap();
        assert!(t.can_join(8));
        assert!(!t.can_join(1));
    }

    #[test]
    fn invalid_bounds_rejected() {
        assert!(Table::new("t1", "s1", 0, 4).is_err());
        assert!(Table::new("t1", "s1", 5, 4).is_err());
        assert!(Table::new("t1", "s1", 4, 4).is_ok());
    }
}
