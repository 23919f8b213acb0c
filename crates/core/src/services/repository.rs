use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::errors::CoreError;
use crate::models::date::parse_date;
use crate::models::price::{AssetSeries, PriceObservation, RawObservation};
use crate::models::settings::{DuplicatePolicy, Settings};
use crate::models::symbol::Symbol;

/// Holds every asset's historical series plus one current price per asset.
///
/// Series and current prices have independent lifecycles: a series is
/// replaced wholesale by `load_series`, a current price by `set_current_price`.
/// A failed load leaves the previous data untouched.
///
/// All dates pass through the configured `Granularity` on the way in, for
/// both stored observations and lookups, so the two sides always compare
/// canonical calendar days.
#[derive(Debug, Clone, Default)]
pub struct PriceRepository {
    settings: Settings,
    series: HashMap<Symbol, AssetSeries>,
    current_prices: HashMap<Symbol, f64>,
}

impl PriceRepository {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            series: HashMap::new(),
            current_prices: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Replace the stored series for `symbol`.
    ///
    /// Every record is validated before anything is stored; the first bad
    /// record aborts the load. Returns the number of observations kept.
    pub fn load_series<I>(&mut self, symbol: Symbol, observations: I) -> Result<usize, CoreError>
    where
        I: IntoIterator<Item = RawObservation>,
    {
        let granularity = self.settings.granularity;
        let mut by_date: BTreeMap<NaiveDate, PriceObservation> = BTreeMap::new();

        for raw in observations {
            let parsed = raw.validate()?;
            let observation = PriceObservation {
                date: granularity.normalize(parsed.date),
                price: parsed.price,
            };

            if let Some(previous) = by_date.insert(observation.date, observation) {
                match self.settings.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(CoreError::InvalidObservation(format!(
                            "duplicate date {} in {symbol} series",
                            previous.date
                        )));
                    }
                    DuplicatePolicy::LastWriteWins => {
                        log::warn!(
                            "Duplicate {symbol} observation on {}: {} replaced by {}",
                            previous.date,
                            previous.price,
                            observation.price
                        );
                    }
                }
            }
        }

        let series = AssetSeries::from_unique(by_date.into_values().collect());
        let count = series.len();
        self.insert_series(symbol, series);
        log::debug!("Loaded {count} observations for {symbol}");
        Ok(count)
    }

    /// Replace the stored series for `symbol` from a JSON array of
    /// `{"date": ..., "price": ...}` records.
    ///
    /// Text that is not a JSON array fails with `Deserialization`; a record
    /// with the wrong shape (missing field, non-string date, ...) fails with
    /// `InvalidObservation`.
    pub fn load_series_json(&mut self, symbol: Symbol, json: &str) -> Result<usize, CoreError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let records = values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| {
                serde_json::from_value::<RawObservation>(value).map_err(|e| {
                    CoreError::InvalidObservation(format!("{symbol} record {idx}: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.load_series(symbol, records)
    }

    /// Replace the current price for `symbol`. The price must be finite and greater than zero.
    pub fn set_current_price(&mut self, symbol: Symbol, price: f64) -> Result<(), CoreError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::InvalidPrice {
                symbol: symbol.to_string(),
                price,
            });
        }
        self.current_prices.insert(symbol, price);
        log::debug!("Current price for {symbol} set to {price}");
        Ok(())
    }

    /// Drop all series and current prices.
    pub fn clear(&mut self) {
        self.series.clear();
        self.current_prices.clear();
    }

    pub(crate) fn insert_series(&mut self, symbol: Symbol, series: AssetSeries) {
        self.series.insert(symbol, series);
    }

    // ── Lookups ─────────────────────────────────────────────────────

    /// Find the observation for `date` after granularity normalization.
    /// `None` is an ordinary outcome, not an error.
    pub fn find_observation(&self, symbol: Symbol, date: NaiveDate) -> Option<PriceObservation> {
        let key = self.settings.granularity.normalize(date);
        self.series.get(&symbol)?.get(key).copied()
    }

    /// Same as `find_observation`, but takes raw text for both symbol and date.
    pub fn find_observation_text(
        &self,
        symbol: &str,
        date: &str,
    ) -> Result<Option<PriceObservation>, CoreError> {
        let symbol: Symbol = symbol.parse()?;
        let date = parse_date(date)?;
        Ok(self.find_observation(symbol, date))
    }

    pub fn current_price(&self, symbol: Symbol) -> Option<f64> {
        self.current_prices.get(&symbol).copied()
    }

    pub fn series(&self, symbol: Symbol) -> Option<&AssetSeries> {
        self.series.get(&symbol)
    }

    /// Earliest and latest dates stored for `symbol`.
    pub fn date_range(&self, symbol: Symbol) -> Option<(NaiveDate, NaiveDate)> {
        self.series.get(&symbol)?.date_range()
    }

    /// Symbols that have a series loaded, in sorted order.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.series.keys().copied().collect();
        symbols.sort();
        symbols
    }
}
