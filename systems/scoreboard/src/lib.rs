#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ranked high-score table and the persistence interface it is stored through.

mod store;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub use store::{MemoryScoreStore, ScoreStore, ScoreStoreError};

/// Number of entries kept when no explicit cap is provided.
pub const DEFAULT_MAX_ENTRIES: usize = 10;

/// Single finished run recorded in the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Player name.
    pub name: String,
    /// Final score.
    pub score: u32,
    /// Highest level or wave reached.
    pub level: u32,
}

impl ScoreRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(name: impl Into<String>, score: u32, level: u32) -> Self {
        Self {
            name: name.into(),
            score,
            level,
        }
    }

    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.level.cmp(&self.level))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// High-score table kept sorted and capped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreTable {
    max_entries: usize,
    records: Vec<ScoreRecord>,
}

impl Default for HighScoreTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl HighScoreTable {
    /// Creates an empty table holding at most `max_entries` records.
    #[must_use]
    pub const fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            records: Vec::new(),
        }
    }

    /// Builds a table from unordered records, keeping only the best ones.
    #[must_use]
    pub fn from_records(max_entries: usize, mut records: Vec<ScoreRecord>) -> Self {
        records.sort_by(ScoreRecord::rank_cmp);
        records.truncate(max_entries);
        Self {
            max_entries,
            records,
        }
    }

    /// Loads the table from a store.
    pub fn load(max_entries: usize, store: &dyn ScoreStore) -> Result<Self, ScoreStoreError> {
        Ok(Self::from_records(max_entries, store.load()?))
    }

    /// Persists the table through a store.
    pub fn save(&self, store: &dyn ScoreStore) -> Result<(), ScoreStoreError> {
        store.save(&self.records)
    }

    /// Maximum number of retained records.
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Records in rank order.
    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Reports whether a run with this score and level is certain to enter the table.
    ///
    /// A run tying the last entry on score and level is ranked by name, which
    /// only [`HighScoreTable::submit`] can decide.
    #[must_use]
    pub fn qualifies(&self, score: u32, level: u32) -> bool {
        if self.max_entries == 0 {
            return false;
        }
        if self.records.len() < self.max_entries {
            return true;
        }
        self.records
            .last()
            .is_some_and(|last| (score, level) > (last.score, last.level))
    }

    /// Inserts a record and returns its zero-based rank when it made the table.
    pub fn submit(&mut self, record: ScoreRecord) -> Option<usize> {
        let rank = self
            .records
            .partition_point(|existing| existing.rank_cmp(&record) != Ordering::Greater);
        if rank >= self.max_entries {
            return None;
        }
        self.records.insert(rank, record);
        self.records.truncate(self.max_entries);
        Some(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_on_score_prefer_higher_level_then_name() {
        let mut records = vec![
            ScoreRecord::new("zed", 100, 2),
            ScoreRecord::new("amy", 100, 2),
            ScoreRecord::new("bob", 100, 5),
        ];
        records.sort_by(ScoreRecord::rank_cmp);

        let names: Vec<_> = records.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, ["bob", "amy", "zed"]);
    }

    #[test]
    fn zero_capacity_table_accepts_nothing() {
        let mut table = HighScoreTable::new(0);
        assert!(!table.qualifies(u32::MAX, u32::MAX));
        assert_eq!(table.submit(ScoreRecord::new("a", 1, 1)), None);
    }
}
