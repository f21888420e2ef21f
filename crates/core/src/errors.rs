use thiserror::Error;

/// Unified error type for the entire trade-journal-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input / Lifecycle ───────────────────────────────────────────
    #[error("Trade validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid trade transition: {0}")]
    InvalidTransition(String),

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No user is signed in")]
    NotSignedIn,

    // ── Store / Network ─────────────────────────────────────────────
    #[error("Store error ({store}): {message}")]
    Store {
        store: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Session persistence ─────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// `true` for failures raised before any store call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::ValidationError(_) | CoreError::InvalidTransition(_)
        )
    }

    /// `true` when the store reported the requested record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::TradeNotFound(_) | CoreError::UserNotFound(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; drop the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
