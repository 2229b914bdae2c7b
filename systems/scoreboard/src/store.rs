use std::cell::RefCell;

use thiserror::Error;

use crate::ScoreRecord;

/// Failures raised by score persistence backends.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    /// The backing medium could not be read or written.
    #[error("score store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Stored records could not be decoded.
    #[error("score store holds malformed records: {0}")]
    Malformed(String),
}

/// Opaque key-value backend that persists the high-score table.
pub trait ScoreStore {
    /// Loads every stored record.
    fn load(&self) -> Result<Vec<ScoreRecord>, ScoreStoreError>;

    /// Replaces the stored records.
    fn save(&self, records: &[ScoreRecord]) -> Result<(), ScoreStoreError>;
}

/// In-memory store that never fails.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: RefCell<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    /// Creates a store seeded with the provided records.
    #[must_use]
    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        Ok(self.records.borrow().clone())
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), ScoreStoreError> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}
