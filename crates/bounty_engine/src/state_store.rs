use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bounty_core::PersistedState;
use monitor_logging::{monitor_debug, monitor_info};
use thiserror::Error;

use crate::persist::{write_atomic, PersistError};

pub const DEFAULT_STATE_FILENAME: &str = "bounty_monitor_state.json";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    /// The file exists but is not a valid state document. Left untouched so an
    /// operator can repair or remove it.
    #[error("state file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write state file: {0}")]
    Persist(#[from] PersistError),
}

/// JSON file holding the last observed snapshot of every platform.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state. A missing file is an empty state; anything
    /// unreadable or unparsable is an error.
    pub fn load(&self) -> Result<PersistedState, StateError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                monitor_info!("No previous state at {:?}, starting fresh", self.path);
                return Ok(PersistedState::new());
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let state: PersistedState =
            serde_json::from_str(&content).map_err(|source| StateError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        monitor_debug!(
            "Loaded state from {:?}: {} program(s)",
            self.path,
            state.program_count()
        );
        Ok(state)
    }

    /// Pretty-print the state (2-space indent) and atomically replace the file.
    pub fn save(&self, state: &PersistedState) -> Result<(), StateError> {
        let mut content = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;
        content.push('\n');
        write_atomic(&self.path, &content)?;
        monitor_debug!("Wrote state to {:?}", self.path);
        Ok(())
    }
}
