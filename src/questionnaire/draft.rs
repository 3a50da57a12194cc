//! Draft persistence for an in-progress questionnaire

use super::values::FormState;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default storage key (one draft per key)
pub const DEFAULT_DRAFT_KEY: &str = "fact-find";

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft storage failed: {0}")]
    Io(#[from] io::Error),
    #[error("draft could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Single string slot holding the serialized draft
#[cfg_attr(test, mockall::automock)]
pub trait DraftStore: Send {
    /// Raw stored draft, `None` when nothing is stored
    fn load(&self) -> Result<Option<String>, DraftError>;

    fn save(&mut self, contents: &str) -> Result<(), DraftError>;

    fn clear(&mut self) -> Result<(), DraftError>;
}

/// Read and decode the stored draft. Storage and decode failures are logged
/// and reported as no draft.
pub fn read_draft(store: &dyn DraftStore) -> Option<FormState> {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read draft: {e}");
            return None;
        }
    };

    match serde_json::from_str::<FormState>(&raw) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::warn!("Ignoring unreadable draft: {e}");
            None
        }
    }
}

/// Encode and store `values`, replacing any previous draft
pub fn write_draft(store: &mut dyn DraftStore, values: &FormState) -> Result<(), DraftError> {
    let contents = serde_json::to_string(values)?;
    store.save(&contents)
}

/// Draft kept as a JSON file in the platform data directory
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Store the draft for `key` under `dir`
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", sanitize_key(key))),
        }
    }

    /// Store under the platform data directory, if one can be determined
    pub fn in_data_dir(key: &str) -> Option<Self> {
        crate::config::project_dirs().map(|dirs| Self::new(dirs.data_dir().join("drafts"), key))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<String>, DraftError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write then rename so a crash never leaves half a draft behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        DEFAULT_DRAFT_KEY.to_string()
    } else {
        cleaned
    }
}

/// In-memory store; clones share the same slot so tests can inspect it
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slot: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

#[cfg(test)]
impl MemoryDraftStore {
    pub fn with_contents(contents: &str) -> Self {
        let store = Self::default();
        *store.slot.lock().unwrap() = Some(contents.to_string());
        store
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<String>, DraftError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), DraftError> {
        *self.slot.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}
