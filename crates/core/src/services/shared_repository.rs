use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::errors::{CalculationError, CoreError};
use crate::models::investment::{InvestmentQuery, InvestmentResult};
use crate::models::price::{PriceObservation, RawObservation};
use crate::models::settings::Settings;
use crate::models::symbol::Symbol;
use crate::services::calculator::ReturnCalculator;
use crate::services::repository::PriceRepository;

/// A `PriceRepository` that can be refreshed from one thread while others calculate.
///
/// One writer at a time; each `calculate` reads the historical and current
/// price under a single read guard, so both come from the same snapshot.
/// Cloning shares the same underlying repository.
#[derive(Debug, Clone, Default)]
pub struct SharedPriceRepository {
    inner: Arc<RwLock<PriceRepository>>,
}

impl SharedPriceRepository {
    pub fn new(settings: Settings) -> Self {
        Self::from_repository(PriceRepository::new(settings))
    }

    pub fn from_repository(repository: PriceRepository) -> Self {
        Self {
            inner: Arc::new(RwLock::new(repository)),
        }
    }

    // Loads swap a fully built series in one step, so a poisoned lock never
    // guards half-written data and is safe to recover.
    fn read(&self) -> RwLockReadGuard<'_, PriceRepository> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PriceRepository> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn load_series<I>(&self, symbol: Symbol, observations: I) -> Result<usize, CoreError>
    where
        I: IntoIterator<Item = RawObservation>,
    {
        // Validate outside the lock; only the swap happens under it.
        let mut staged = PriceRepository::new(*self.read().settings());
        let count = staged.load_series(symbol, observations)?;
        if let Some(series) = staged.series(symbol) {
            self.write().insert_series(symbol, series.clone());
        }
        Ok(count)
    }

    pub fn set_current_price(&self, symbol: Symbol, price: f64) -> Result<(), CoreError> {
        self.write().set_current_price(symbol, price)
    }

    pub fn find_observation(&self, symbol: Symbol, date: NaiveDate) -> Option<PriceObservation> {
        self.read().find_observation(symbol, date)
    }

    pub fn current_price(&self, symbol: Symbol) -> Option<f64> {
        self.read().current_price(symbol)
    }

    pub fn calculate(&self, query: &InvestmentQuery) -> Result<InvestmentResult, CalculationError> {
        let guard = self.read();
        ReturnCalculator::new().calculate(&guard, query)
    }

    /// Run `f` against a consistent snapshot of the repository.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&PriceRepository) -> R) -> R {
        f(&self.read())
    }
}
