use thiserror::Error;

/// Unified error type for the monli-core library.
///
/// The ledger calculator itself never fails; everything built around it
/// (validation, price feeds, the AI assistant, snapshot I/O) returns
/// `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Snapshot / File ─────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No provider available for {0}")]
    NoProvider(String),

    #[error("Price not available for {symbol} in {currency} on {date}")]
    PriceNotAvailable {
        symbol: String,
        currency: String,
        date: String,
    },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Budget not found: {0}")]
    BudgetNotFound(String),

    // ── Plans & Usage ───────────────────────────────────────────────
    #[error("{0} is available for PRO plan only")]
    PlanRestricted(String),

    #[error("{feature} usage limit reached ({limit})")]
    UsageLimitReached { feature: String, limit: u32 },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),
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

impl CoreError {
    /// Write-side counterpart of `From<serde_json::Error>`, which maps
    /// parse failures to [`CoreError::Deserialization`].
    pub fn serialization(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Price feeds take the API key as a query parameter; never surface it.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
