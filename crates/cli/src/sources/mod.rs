pub mod file;
pub mod http;

use async_trait::async_trait;
use crypto_return_core::errors::CoreError;
use crypto_return_core::models::symbol::Symbol;
use crypto_return_core::CryptoCalculator;

use crate::errors::SourceError;

/// Where historical series files come from.
///
/// Each symbol has one JSON file named after `Symbol::file_stem()`
/// (`btc.json`, `ether.json`, ...), holding `[{"date": ..., "price": ...}]`.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the raw JSON text of one symbol's series.
    async fn fetch_series(&self, symbol: Symbol) -> Result<String, SourceError>;
}

/// Why a symbol could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Data(#[from] CoreError),
}

/// Fetch one symbol's series and load it into the calculator.
/// Returns the number of observations loaded.
pub async fn load_symbol(
    source: &dyn SeriesSource,
    calculator: &mut CryptoCalculator,
    symbol: Symbol,
) -> Result<usize, LoadError> {
    let json = source.fetch_series(symbol).await?;
    let count = calculator.load_series_json(symbol, &json)?;
    tracing::info!(source = source.name(), %symbol, count, "Loaded price series");
    Ok(count)
}
