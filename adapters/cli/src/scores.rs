use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tile_siege_system_scoreboard::{ScoreRecord, ScoreStore, ScoreStoreError};

/// Score store persisting the table as a pretty-printed JSON array.
///
/// A missing or empty file is treated as an empty table.
#[derive(Clone, Debug)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|error| ScoreStoreError::Malformed(error.to_string()))
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), ScoreStoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|error| ScoreStoreError::Malformed(error.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
