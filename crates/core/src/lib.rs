pub mod errors;
pub mod models;
pub mod services;

use chrono::NaiveDate;
use models::{
    investment::{InvestmentQuery, InvestmentResult},
    price::{PriceObservation, RawObservation},
    settings::Settings,
    symbol::Symbol,
};
use services::{calculator::ReturnCalculator, repository::PriceRepository};

use errors::{CalculationError, CoreError};

/// Main entry point for the crypto-return core library.
///
/// Load price data once, then call `calculate` as often as needed:
///
/// ```
/// use crypto_return_core::CryptoCalculator;
/// use crypto_return_core::models::investment::InvestmentQuery;
/// use crypto_return_core::models::price::RawObservation;
/// use crypto_return_core::models::symbol::Symbol;
///
/// let mut calc = CryptoCalculator::new();
/// calc.load_series(Symbol::Btc, vec![RawObservation::new("2024-01-01", 40000.0)]).unwrap();
/// calc.set_current_price(Symbol::Btc, 69000.0).unwrap();
///
/// let query = InvestmentQuery::parse("btc", "01/01/2024", 1000.0).unwrap();
/// let result = calc.calculate(&query).unwrap();
/// assert!((result.profit_loss_usd - 725.0).abs() < 1e-9);
/// ```
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct CryptoCalculator {
    repository: PriceRepository,
    calculator: ReturnCalculator,
}

impl CryptoCalculator {
    /// Empty calculator with default settings (daily granularity, duplicates rejected).
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            repository: PriceRepository::new(settings),
            calculator: ReturnCalculator::new(),
        }
    }

    // ── Price data ──────────────────────────────────────────────────

    /// Replace the historical series for `symbol`. On error the previous series is kept.
    pub fn load_series<I>(&mut self, symbol: Symbol, observations: I) -> Result<usize, CoreError>
    where
        I: IntoIterator<Item = RawObservation>,
    {
        self.repository.load_series(symbol, observations)
    }

    /// Replace the historical series for `symbol` from a JSON series file's contents.
    pub fn load_series_json(&mut self, symbol: Symbol, json: &str) -> Result<usize, CoreError> {
        self.repository.load_series_json(symbol, json)
    }

    pub fn set_current_price(&mut self, symbol: Symbol, price: f64) -> Result<(), CoreError> {
        self.repository.set_current_price(symbol, price)
    }

    #[must_use]
    pub fn find_observation(&self, symbol: Symbol, date: NaiveDate) -> Option<PriceObservation> {
        self.repository.find_observation(symbol, date)
    }

    #[must_use]
    pub fn current_price(&self, symbol: Symbol) -> Option<f64> {
        self.repository.current_price(symbol)
    }

    /// Read-only access to the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &PriceRepository {
        &self.repository
    }

    // ── Calculation ─────────────────────────────────────────────────

    pub fn calculate(&self, query: &InvestmentQuery) -> Result<InvestmentResult, CalculationError> {
        self.calculator.calculate(&self.repository, query)
    }
}
