use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::ItemStatus;

/// Persisted snapshot of an in-progress walkthrough. Only answer state is
/// stored; the checklist text itself comes from the canonical template when
/// the draft is restored, with items matched by position. Every field is
/// tolerant of being absent so a partial draft still resumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
    #[serde(default)]
    pub current_section: usize,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionDraft {
    #[serde(default)]
    pub items: Vec<ItemStatus>,
}

/// Durable single-key store for the current in-progress audit. A newer
/// checkpoint supersedes an older one by overwrite; there is no queue.
pub trait DraftStore {
    /// Persist the draft, replacing any previous checkpoint. Errors are
    /// reported so the workflow can log them, but callers must treat a
    /// failed write as degraded resumability, never as a failed answer.
    fn checkpoint(&mut self, draft: &SessionDraft) -> Result<(), DraftError>;

    /// Load the saved draft, if one exists. A corrupt or unreadable
    /// checkpoint resolves to `None` rather than an error.
    fn restore(&self) -> Option<SessionDraft>;

    /// Delete the saved draft. Deleting an absent draft is not an error.
    fn discard(&mut self) -> Result<(), DraftError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("failed to encode draft: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write draft: {0}")]
    Write(#[source] io::Error),
    #[error("failed to delete draft: {0}")]
    Delete(#[source] io::Error),
    #[error("draft store unavailable: {0}")]
    Unavailable(String),
}

/// Draft store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn checkpoint(&mut self, draft: &SessionDraft) -> Result<(), DraftError> {
        let encoded = serde_json::to_string(draft)?;
        fs::write(&self.path, encoded).map_err(DraftError::Write)
    }

    fn restore(&self) -> Option<SessionDraft> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "draft unreadable; proceeding without it");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "draft corrupt; proceeding without it");
                None
            }
        }
    }

    fn discard(&mut self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DraftError::Delete(err)),
        }
    }
}

/// In-memory draft store for tests and the stateless HTTP surface. Clones
/// share the same slot, so a "restart" can be simulated by handing a clone
/// to a fresh workflow.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slot: Arc<Mutex<Option<SessionDraft>>>,
    fail_writes: bool,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising degraded
    /// resumability paths.
    pub fn failing() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            fail_writes: true,
        }
    }
}

impl DraftStore for MemoryDraftStore {
    fn checkpoint(&mut self, draft: &SessionDraft) -> Result<(), DraftError> {
        if self.fail_writes {
            return Err(DraftError::Unavailable("writes disabled".to_string()));
        }
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| DraftError::Unavailable("slot poisoned".to_string()))?;
        *slot = Some(draft.clone());
        Ok(())
    }

    fn restore(&self) -> Option<SessionDraft> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn discard(&mut self) -> Result<(), DraftError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| DraftError::Unavailable("slot poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}
