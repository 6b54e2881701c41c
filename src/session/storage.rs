use crate::error::Result;

/// Durable client-local storage for the active session id.
pub trait SessionStore: Send + Sync {
    /// The persisted active session id, if any. Blank values count as absent.
    fn load_active_session(&self) -> Option<String>;

    /// Persist `session_id` as the active session.
    fn save_active_session(&self, session_id: &str) -> Result<()>;

    /// Forget the active session. Clearing an absent id is not an error.
    fn clear_active_session(&self) -> Result<()>;
}
