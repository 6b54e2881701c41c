mod filesystem;
mod storage;

pub use filesystem::{default_state_dir, FilesystemSessionStore, ACTIVE_SESSION_FILE};
pub use storage::SessionStore;
