use crate::errors::CalculationError;
use crate::models::investment::{InvestmentQuery, InvestmentResult};
use crate::services::repository::PriceRepository;

/// Turns an `InvestmentQuery` into an `InvestmentResult`.
///
/// Stateless: every call is a pure function of the query and the
/// repository contents at the time of the call. Failures are deterministic,
/// so retrying with the same input gives the same error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnCalculator;

impl ReturnCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the return of a hypothetical purchase.
    ///
    /// 1. Amount must be finite and > 0.
    /// 2. Historical price for (symbol, date) must exist.
    /// 3. Current price for symbol must exist.
    /// 4. units = amount / historical price
    /// 5. value = units * current price
    /// 6. P/L = value - amount, P/L % = P/L / amount * 100
    ///
    /// A non-finite unit count fails with `DivisionByZero`; any other
    /// non-finite field fails with `Overflow`.
    pub fn calculate(
        &self,
        repository: &PriceRepository,
        query: &InvestmentQuery,
    ) -> Result<InvestmentResult, CalculationError> {
        let InvestmentQuery {
            symbol,
            purchase_date,
            amount_usd,
        } = *query;

        if !amount_usd.is_finite() || amount_usd <= 0.0 {
            log::debug!("Rejected amount {amount_usd} for {symbol}");
            return Err(CalculationError::InvalidAmount(amount_usd));
        }

        let observation = repository
            .find_observation(symbol, purchase_date)
            .ok_or_else(|| {
                log::debug!("No {symbol} observation for {purchase_date}");
                CalculationError::NoHistoricalData {
                    symbol: symbol.to_string(),
                    date: purchase_date.to_string(),
                }
            })?;

        let current_price = repository
            .current_price(symbol)
            .ok_or_else(|| CalculationError::NoCurrentPrice(symbol.to_string()))?;

        // Load validation guarantees a positive price; reaching this means the
        // repository invariant was broken somewhere.
        if observation.price <= 0.0 || !observation.price.is_finite() {
            log::error!(
                "Repository invariant violated: {symbol} price on {} is {}",
                observation.date,
                observation.price
            );
            return Err(CalculationError::DivisionByZero {
                symbol: symbol.to_string(),
                date: observation.date.to_string(),
            });
        }

        let asset_amount_purchased = amount_usd / observation.price;
        if !asset_amount_purchased.is_finite() {
            log::error!(
                "Unit count overflowed: {amount_usd} / {} for {symbol} on {}",
                observation.price,
                observation.date
            );
            return Err(CalculationError::DivisionByZero {
                symbol: symbol.to_string(),
                date: observation.date.to_string(),
            });
        }

        let current_value_usd = asset_amount_purchased * current_price;
        let profit_loss_usd = current_value_usd - amount_usd;
        let profit_loss_percent = (profit_loss_usd / amount_usd) * 100.0;

        if ![current_value_usd, profit_loss_usd, profit_loss_percent]
            .iter()
            .all(|v| v.is_finite())
        {
            log::error!(
                "Result overflowed for {symbol}: {asset_amount_purchased} units at {current_price}"
            );
            return Err(CalculationError::Overflow {
                symbol: symbol.to_string(),
                amount_usd,
            });
        }

        log::debug!(
            "{symbol} {amount_usd} USD on {purchase_date}: {asset_amount_purchased} units, now {current_value_usd} USD"
        );

        Ok(InvestmentResult {
            asset_amount_purchased,
            current_value_usd,
            profit_loss_usd,
            profit_loss_percent,
        })
    }
}
