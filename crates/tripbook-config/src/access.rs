//! Passcode gate.
//!
//! A shared passcode unlocks the itinerary on this machine and the unlock is
//! remembered in a small JSON state file. The comparison is plain equality
//! and the state file is trusted as-is: this keeps casual viewers out, it is
//! not access control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::AccessError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UnlockState {
    unlocked: bool,
    unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PasscodeGate {
    expected: String,
    state_path: PathBuf,
}

impl PasscodeGate {
    pub fn new(expected: impl Into<String>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            expected: expected.into(),
            state_path: state_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Whether a previous unlock is remembered.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at().is_some()
    }

    /// When the remembered unlock happened.
    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        let content = match std::fs::read_to_string(&self.state_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.state_path.display(), "Failed to read unlock state: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<UnlockState>(&content) {
            Ok(state) if state.unlocked => Some(state.unlocked_at),
            Ok(_) => None,
            Err(e) => {
                debug!(path = %self.state_path.display(), "Ignoring corrupt unlock state: {}", e);
                None
            }
        }
    }

    /// Check `attempt` and remember the unlock on success.
    pub fn unlock(&self, attempt: &str) -> Result<DateTime<Utc>, AccessError> {
        if attempt != self.expected {
            info!("Unlock rejected");
            return Err(AccessError::WrongPasscode);
        }

        let state = UnlockState {
            unlocked: true,
            unlocked_at: Utc::now(),
        };

        if let Some(parent) = self.state_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.state_path, serde_json::to_string_pretty(&state)?)?;

        info!(path = %self.state_path.display(), "Itinerary unlocked");
        Ok(state.unlocked_at)
    }

    /// Forget the remembered unlock. Locking an already locked gate is fine.
    pub fn lock(&self) -> Result<(), AccessError> {
        match std::fs::remove_file(&self.state_path) {
            Ok(()) => {
                info!("Itinerary locked");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
