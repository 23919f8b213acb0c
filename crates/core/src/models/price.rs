use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::date::parse_date;

/// A single historical price data point (date → price in USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub price: f64,
}

impl PriceObservation {
    /// Validate and build an observation. The price must be finite and greater than zero.
    pub fn new(date: NaiveDate, price: f64) -> Result<Self, CoreError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::InvalidObservation(format!(
                "price {price} on {date} must be finite and greater than zero"
            )));
        }
        Ok(Self { date, price })
    }
}

/// Price as it appears in a series file: usually a JSON number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
    /// Anything else (null, bool, object). Always rejected on load.
    Other(serde_json::Value),
}

impl RawPrice {
    fn to_f64(&self) -> Option<f64> {
        match self {
            RawPrice::Number(n) => Some(*n),
            RawPrice::Text(s) => s.trim().parse::<f64>().ok(),
            RawPrice::Other(_) => None,
        }
    }
}

impl From<f64> for RawPrice {
    fn from(n: f64) -> Self {
        RawPrice::Number(n)
    }
}

impl From<&str> for RawPrice {
    fn from(s: &str) -> Self {
        RawPrice::Text(s.to_string())
    }
}

impl From<String> for RawPrice {
    fn from(s: String) -> Self {
        RawPrice::Text(s)
    }
}

/// An unvalidated (date text, price) pair, the shape of one record in a series file:
/// `{"date": "01/01/2024", "price": 42280.23}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub price: RawPrice,
}

impl RawObservation {
    pub fn new(date: impl Into<String>, price: impl Into<RawPrice>) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
        }
    }

    /// Parse the date and price, failing fast on anything malformed.
    ///
    /// - Unparseable date → `InvalidDate`
    /// - Non-numeric, NaN, infinite, zero or negative price → `InvalidObservation`
    pub fn validate(&self) -> Result<PriceObservation, CoreError> {
        let date = parse_date(&self.date)?;
        let price = self.price.to_f64().ok_or_else(|| {
            CoreError::InvalidObservation(format!(
                "price {:?} on {} is not a number",
                self.price, self.date
            ))
        })?;
        PriceObservation::new(date, price)
    }
}

/// One asset's historical series, sorted by date with unique dates.
///
/// Input order does not matter; lookups go by date value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    observations: Vec<PriceObservation>,
}

impl AssetSeries {
    /// Build from observations that already carry unique dates.
    pub(crate) fn from_unique(mut observations: Vec<PriceObservation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self { observations }
    }

    /// Find the observation for an exact date. O(log n).
    pub fn get(&self, date: NaiveDate) -> Option<&PriceObservation> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|idx| &self.observations[idx])
    }

    /// All observations, oldest first.
    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest and latest dates in the series, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.observations.first()?;
        let last = self.observations.last()?;
        Some((first.date, last.date))
    }
}
