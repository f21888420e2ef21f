use crate::errors::CoreError;
use crate::models::session::Session;
use crate::models::user::User;

/// Holds the signed-in session and moves it in and out of persistent form.
///
/// Lifecycle: populated on sign-in, cleared on sign-out, read at the start of
/// every view via [`SessionManager::current`]. Persistence is plain JSON so a
/// browser host can keep it in local storage and a native host in a file.
#[derive(Debug, Default)]
pub struct SessionManager {
    session: Option<Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Start a session for `session.user`, replacing any previous one.
    pub fn sign_in(&mut self, session: Session) -> &Session {
        log::info!("Session started for user {}", session.user.id);
        self.session.insert(session)
    }

    /// End the current session. Returns the user that was signed in, if any.
    pub fn sign_out(&mut self) -> Option<User> {
        let ended = self.session.take().map(|s| s.user);
        if let Some(user) = &ended {
            log::info!("Session ended for user {}", user.id);
        }
        ended
    }

    /// The active session, or `CoreError::NotSignedIn`.
    pub fn current(&self) -> Result<&Session, CoreError> {
        self.session.as_ref().ok_or(CoreError::NotSignedIn)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Serialize the active session to JSON (`{"user": {...}}`).
    pub fn to_json(&self) -> Result<String, CoreError> {
        let session = self.current()?;
        serde_json::to_string(session)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize session: {e}")))
    }

    /// Restore a session from JSON produced by [`SessionManager::to_json`]
    /// (or the raw user-creation response of the backend).
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let session: Session = serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse session: {e}")))?;
        Ok(Self {
            session: Some(session),
        })
    }

    /// Save the active session to a JSON file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&self, path: &str) -> Result<(), CoreError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a session from a JSON file on disk (native only).
    /// A missing file means nobody is signed in.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the session file (sign-out on native hosts). Missing file is fine.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear_file(path: &str) -> Result<(), CoreError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
