use super::storage::SessionStore;
use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ACTIVE_SESSION_FILE: &str = "session_id";

/// Keeps the active session id as plain text in a single file.
pub struct FilesystemSessionStore {
    dir: PathBuf,
}

impl FilesystemSessionStore {
    /// Store under `~/.cache/ikms-chat`.
    pub fn new() -> Self {
        Self::with_dir(default_state_dir())
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_file(&self) -> PathBuf {
        self.dir.join(ACTIVE_SESSION_FILE)
    }
}

pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("ikms-chat")
}

impl SessionStore for FilesystemSessionStore {
    fn load_active_session(&self) -> Option<String> {
        let path = self.session_file();
        match fs::read_to_string(&path) {
            Ok(content) => {
                let id = content.trim();
                (!id.is_empty()).then(|| id.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read active session");
                None
            }
        }
    }

    fn save_active_session(&self, session_id: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.session_file(), session_id)?;
        debug!(session_id, "persisted active session");
        Ok(())
    }

    fn clear_active_session(&self) -> Result<()> {
        match fs::remove_file(self.session_file()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for FilesystemSessionStore {
    fn default() -> Self {
        Self::new()
    }
}
