use thiserror::Error;

/// Unified error type for the entire crypto-return-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// None of these are fatal: they describe bad input or a missing piece of
/// data, and the caller decides how to present them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Load-time data ──────────────────────────────────────────────
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid price for {symbol}: {price} (must be finite and greater than zero)")]
    InvalidPrice { symbol: String, price: f64 },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Query ───────────────────────────────────────────────────────
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid amount: {0} (must be finite and greater than zero)")]
    InvalidAmount(f64),

    #[error("No historical data for {symbol} on {date}")]
    NoHistoricalData { symbol: String, date: String },

    #[error("No current price set for {0}")]
    NoCurrentPrice(String),

    #[error("Division by zero: historical price for {symbol} on {date} is zero")]
    DivisionByZero { symbol: String, date: String },

    #[error("Result for {amount_usd} USD of {symbol} is too large to represent")]
    Overflow { symbol: String, amount_usd: f64 },
}

/// The error returned by `calculate`.
pub type CalculationError = CoreError;

impl CoreError {
    /// True for errors the user can fix by changing the form input
    /// (symbol, date or amount). Everything else points at the loaded data.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownSymbol(_)
                | CoreError::InvalidAmount(_)
                | CoreError::NoHistoricalData { .. }
                | CoreError::InvalidDate(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
