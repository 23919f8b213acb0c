mod config;
mod errors;
mod render;
mod sources;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use config::{CliConfig, DataLocation};
use crypto_return_core::models::investment::InvestmentQuery;
use crypto_return_core::models::settings::Granularity;
use crypto_return_core::models::symbol::Symbol;
use crypto_return_core::CryptoCalculator;
use sources::{file::FileSource, http::HttpSource, load_symbol, SeriesSource};

#[derive(Parser, Debug)]
#[command(version, about = "What would a past crypto purchase be worth today?")]
struct Args {
    /// Cryptocurrency: BTC, ETHER, SOL or BNB
    #[arg(short, long, default_value = "BTC")]
    symbol: String,

    /// Purchase date, YYYY-MM-DD or MM/DD/YYYY
    #[arg(short, long)]
    date: String,

    /// Amount invested, in USD
    #[arg(short, long, allow_negative_numbers = true)]
    amount: f64,

    /// Directory holding the series files (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Base URL serving the series files (overrides config and --data-dir)
    #[arg(long)]
    base_url: Option<String>,

    /// Current price of the selected symbol (overrides config)
    #[arg(long)]
    current_price: Option<f64>,

    /// Treat the series as monthly: any day resolves to that month's observation
    #[arg(long)]
    monthly: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &Args) -> Result<CliConfig> {
    let mut config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
        config.base_url = None;
    }
    if let Some(url) = &args.base_url {
        config.base_url = Some(url.clone());
    }
    if args.monthly {
        config.settings.granularity = Granularity::Monthly;
    }
    Ok(config)
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = resolve_config(&args)?;

    let query = match InvestmentQuery::parse(&args.symbol, &args.date, args.amount) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", render::error_message(&e));
            return Ok(ExitCode::from(2));
        }
    };
    let symbol: Symbol = query.symbol;

    let mut calculator = CryptoCalculator::with_settings(config.settings);

    for (s, price) in config.current_prices().context("Invalid current_prices in config")? {
        calculator
            .set_current_price(s, price)
            .with_context(|| format!("Invalid configured current price for {s}"))?;
    }
    if let Some(price) = args.current_price {
        calculator
            .set_current_price(symbol, price)
            .context("Invalid --current-price")?;
    }

    let source: Box<dyn SeriesSource> = match config.data_location() {
        DataLocation::Dir(dir) => Box::new(FileSource::new(dir)),
        DataLocation::Url(url) => Box::new(HttpSource::new(url)),
    };
    load_symbol(source.as_ref(), &mut calculator, symbol)
        .await
        .with_context(|| format!("Failed to load crypto data for {symbol}"))?;

    match calculator.calculate(&query) {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render::render_result(symbol, &result));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if e.is_user_correctable() {
                tracing::debug!(error = %e, "Calculation rejected");
            } else {
                tracing::error!(error = %e, "Calculation failed");
            }
            eprintln!("{}", render::error_message(&e));
            Ok(ExitCode::from(2))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amount_reaches_the_calculator() {
        let args =
            Args::try_parse_from(["crypto-return", "--date", "2024-01-01", "--amount", "-5"])
                .unwrap();
        assert_eq!(args.amount, -5.0);

        let query = InvestmentQuery::parse(&args.symbol, &args.date, args.amount).unwrap();
        let err = CryptoCalculator::new().calculate(&query).unwrap_err();
        assert_eq!(
            render::error_message(&err),
            "Please enter an amount greater than zero."
        );
    }

    #[test]
    fn short_flags_and_defaults() {
        let args = Args::try_parse_from(["crypto-return", "-d", "03/01/2024", "-a", "250"]).unwrap();
        assert_eq!(args.symbol, "BTC");
        assert_eq!(args.amount, 250.0);
        assert!(!args.monthly && !args.json);
    }
}
