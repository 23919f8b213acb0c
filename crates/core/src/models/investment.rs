use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::date::parse_date;
use super::symbol::Symbol;

/// A hypothetical purchase: `amount_usd` of `symbol` bought on `purchase_date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentQuery {
    pub symbol: Symbol,
    pub purchase_date: NaiveDate,
    pub amount_usd: f64,
}

impl InvestmentQuery {
    pub fn new(symbol: Symbol, purchase_date: NaiveDate, amount_usd: f64) -> Self {
        Self {
            symbol,
            purchase_date,
            amount_usd,
        }
    }

    /// Build a query from raw form values.
    /// The amount is checked later by the calculator, not here.
    pub fn parse(symbol: &str, purchase_date: &str, amount_usd: f64) -> Result<Self, CoreError> {
        Ok(Self {
            symbol: symbol.parse()?,
            purchase_date: parse_date(purchase_date)?,
            amount_usd,
        })
    }
}

/// Whether a result is a gain or a loss. Break-even counts as profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Profit,
    Loss,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Profit => write!(f, "Profit"),
            Outcome::Loss => write!(f, "Loss"),
        }
    }
}

/// Result of one calculation, at full precision. Rounding is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    /// Units of the asset the amount would have bought at the historical price.
    pub asset_amount_purchased: f64,

    /// What those units are worth at the current price.
    pub current_value_usd: f64,

    /// `current_value_usd - amount_usd`; negative for a loss.
    pub profit_loss_usd: f64,

    /// `profit_loss_usd / amount_usd * 100`.
    pub profit_loss_percent: f64,
}

impl InvestmentResult {
    pub fn outcome(&self) -> Outcome {
        if self.profit_loss_usd >= 0.0 {
            Outcome::Profit
        } else {
            Outcome::Loss
        }
    }
}
