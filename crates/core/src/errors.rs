use thiserror::Error;

/// Unified error type for the entire family-finance-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / Persistence ───────────────────────────────────────
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Database mirror ─────────────────────────────────────────────
    #[error("Database error: {0}")]
    Database(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    #[error("Family member not found: {0}")]
    MemberNotFound(String),

    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(String),

    // ── Accounts ────────────────────────────────────────────────────
    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Credential error: {0}")]
    Credentials(String),
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

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for CoreError {
    fn from(e: rusqlite::Error) -> Self {
        CoreError::Database(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for CoreError {
    fn from(e: argon2::password_hash::Error) -> Self {
        CoreError::Credentials(e.to_string())
    }
}
