//! Bill number enumeration.
//!
//! The API offers no listing endpoint we rely on, so the numbers to request
//! come from a table of `(chamber, session) -> (inclusive ranges, excluded ids)`.
//! Gaps in the table are numbers that were never assigned.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MAX_BILL_NUMBER;
use crate::error::{HarvesterError, Result};
use crate::types::Chamber;

/// Inclusive range of bill numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub start: u32,
    pub end: u32,
}

/// Bill numbers known for one chamber and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRange {
    pub chamber: Chamber,
    pub session: u32,
    pub ranges: Vec<IdRange>,
    #[serde(default)]
    pub exclude: Vec<u32>,
}

impl BillRange {
    #[must_use]
    pub fn new(chamber: Chamber, session: u32) -> Self {
        Self {
            chamber,
            session,
            ranges: Vec::new(),
            exclude: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.ranges.push(IdRange { start, end });
        self
    }

    #[must_use]
    pub fn with_excluded(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.exclude.extend(ids);
        self
    }

    /// Expand into a strictly ascending list of bill numbers.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        let excluded: BTreeSet<u32> = self.exclude.iter().copied().collect();
        let ids: BTreeSet<u32> = self
            .ranges
            .iter()
            .flat_map(|r| r.start..=r.end)
            .filter(|id| !excluded.contains(id))
            .collect();
        ids.into_iter().collect()
    }

    fn check(&self) -> Result<()> {
        if self.session == 0 {
            return Err(HarvesterError::InvalidIdTable(format!(
                "{}: session must be positive",
                self.chamber
            )));
        }
        if self.ranges.is_empty() {
            return Err(HarvesterError::InvalidIdTable(format!(
                "{}{}: no ranges",
                self.chamber, self.session
            )));
        }
        for range in &self.ranges {
            if range.start == 0 || range.start > range.end {
                return Err(HarvesterError::InvalidIdTable(format!(
                    "{}{}: invalid range {}-{}",
                    self.chamber, self.session, range.start, range.end
                )));
            }
            if range.end > MAX_BILL_NUMBER {
                return Err(HarvesterError::InvalidIdTable(format!(
                    "{}{}: range {}-{} exceeds bill number limit {MAX_BILL_NUMBER}",
                    self.chamber, self.session, range.start, range.end
                )));
            }
        }
        for id in &self.exclude {
            if *id == 0 || *id > MAX_BILL_NUMBER {
                return Err(HarvesterError::InvalidIdTable(format!(
                    "{}{}: invalid excluded id {id}",
                    self.chamber, self.session
                )));
            }
        }
        Ok(())
    }
}

/// Lookup table of bill ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillIdTable {
    entries: Vec<BillRange>,
}

impl BillIdTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry; a later entry for the same pair replaces the earlier one.
    pub fn register(&mut self, entry: BillRange) {
        self.entries
            .retain(|e| !(e.chamber == entry.chamber && e.session == entry.session));
        self.entries.push(entry);
    }

    /// Ranges for the 116th congress, as assigned on 2019-10-09.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();

        // hr2 and hr10-hr19 were reserved and never introduced
        table.register(
            BillRange::new(Chamber::House, 116)
                .with_range(1, 9)
                .with_range(20, 4630)
                .with_excluded([2]),
        );
        table.register(BillRange::new(Chamber::Senate, 116).with_range(1, 2594));

        table
    }

    /// Parse a table from YAML (a list of entries).
    ///
    /// ```yaml
    /// - chamber: hr
    ///   session: 116
    ///   ranges:
    ///     - { start: 1, end: 9 }
    ///     - { start: 20, end: 4630 }
    ///   exclude: [2]
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let entries: Vec<BillRange> = serde_yaml_ng::from_str(yaml)?;
        let mut table = Self::new();
        for entry in entries {
            entry.check()?;
            table.register(entry);
        }
        Ok(table)
    }

    /// Load a table from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    #[must_use]
    pub fn get(&self, chamber: Chamber, session: u32) -> Option<&BillRange> {
        self.entries
            .iter()
            .find(|e| e.chamber == chamber && e.session == session)
    }

    /// Bill numbers to request for a chamber and session, ascending and unique.
    pub fn enumerate(&self, chamber: Chamber, session: u32) -> Result<Vec<u32>> {
        let entry = self
            .get(chamber, session)
            .ok_or_else(|| HarvesterError::UnknownBillRange {
                chamber: chamber.to_string(),
                session,
            })?;

        let ids = entry.ids();
        if ids.is_empty() {
            return Err(HarvesterError::EmptyBillRange {
                chamber: chamber.to_string(),
                session,
            });
        }
        Ok(ids)
    }
}
