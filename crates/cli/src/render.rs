use crypto_return_core::errors::CoreError;
use crypto_return_core::models::investment::InvestmentResult;
use crypto_return_core::models::symbol::Symbol;

/// Human-readable summary of a result.
///
/// Units get 8 decimals, USD and percent get 2. The P/L line shows absolute
/// values; the label carries the sign.
pub fn render_result(symbol: Symbol, result: &InvestmentResult) -> String {
    format!(
        "Amount of crypto purchased: {:.8} {symbol}\nCurrent value: ${:.2}\n{}: {:.2}% (${:.2})",
        result.asset_amount_purchased,
        result.current_value_usd,
        result.outcome(),
        result.profit_loss_percent.abs(),
        result.profit_loss_usd.abs(),
    )
}

/// Message shown to the user for a failed calculation.
pub fn error_message(err: &CoreError) -> String {
    match err {
        CoreError::NoHistoricalData { .. } => {
            "No historical data available for the selected date.".to_string()
        }
        CoreError::UnknownSymbol(s) => format!("No data available for cryptocurrency {s:?}."),
        CoreError::InvalidAmount(_) => "Please enter an amount greater than zero.".to_string(),
        CoreError::InvalidDate(_) => {
            "Please enter a valid purchase date (YYYY-MM-DD or MM/DD/YYYY).".to_string()
        }
        CoreError::NoCurrentPrice(s) => format!("No current price available for {s}."),
        other => format!("There was an error with the crypto data: {other}"),
    }
}
