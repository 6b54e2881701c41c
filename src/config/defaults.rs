use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:8001";

pub fn default_timeout_secs() -> u64 {
    120
}

pub fn default_state_dir() -> PathBuf {
    crate::session::default_state_dir()
}
