// ═══════════════════════════════════════════════════════════════════
// Service Tests: PriceRepository, ReturnCalculator
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use crypto_return_core::errors::CoreError;
use crypto_return_core::models::investment::{InvestmentQuery, InvestmentResult, Outcome};
use crypto_return_core::models::price::RawObservation;
use crypto_return_core::models::settings::{DuplicatePolicy, Granularity, Settings};
use crypto_return_core::models::symbol::Symbol;
use crypto_return_core::services::calculator::ReturnCalculator;
use crypto_return_core::services::repository::PriceRepository;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

fn btc_series() -> Vec<RawObservation> {
    vec![
        RawObservation::new("02/01/2024", 43000.0),
        RawObservation::new("01/01/2024", 40000.0),
        RawObservation::new("2024-03-01", "61000"),
    ]
}

fn repo_with_btc(current: f64) -> PriceRepository {
    let mut repo = PriceRepository::default();
    repo.load_series(Symbol::Btc, btc_series()).unwrap();
    repo.set_current_price(Symbol::Btc, current).unwrap();
    repo
}

// ═══════════════════════════════════════════════════════════════════
//  PriceRepository
// ═══════════════════════════════════════════════════════════════════

mod repository {
    use super::*;

    #[test]
    fn load_returns_count_and_sorts() {
        let mut repo = PriceRepository::default();
        let count = repo.load_series(Symbol::Btc, btc_series()).unwrap();
        assert_eq!(count, 3);

        let dates: Vec<NaiveDate> = repo
            .series(Symbol::Btc)
            .unwrap()
            .observations()
            .iter()
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);
        assert_eq!(repo.date_range(Symbol::Btc), Some((d(2024, 1, 1), d(2024, 3, 1))));
    }

    #[test]
    fn find_matches_across_formats() {
        let repo = repo_with_btc(69000.0);
        let iso = repo.find_observation_text("BTC", "2024-02-01").unwrap();
        let us = repo.find_observation_text("btc", "02/01/2024").unwrap();
        assert!(iso.is_some());
        assert_eq!(iso, us);
        assert_eq!(iso.unwrap().price, 43000.0);
    }

    #[test]
    fn find_missing_date_is_none() {
        let repo = repo_with_btc(69000.0);
        assert_eq!(repo.find_observation(Symbol::Btc, d(2024, 1, 2)), None);
        assert_eq!(repo.find_observation_text("BTC", "01/02/2024").unwrap(), None);
    }

    #[test]
    fn find_unloaded_symbol_is_none() {
        let repo = repo_with_btc(69000.0);
        assert_eq!(repo.find_observation(Symbol::Sol, d(2024, 1, 1)), None);
    }

    #[test]
    fn find_text_rejects_unknown_symbol_and_bad_date() {
        let repo = repo_with_btc(69000.0);
        assert!(matches!(
            repo.find_observation_text("LTC", "2024-01-01"),
            Err(CoreError::UnknownSymbol(_))
        ));
        assert!(matches!(
            repo.find_observation_text("BTC", "first of jan"),
            Err(CoreError::InvalidDate(_))
        ));
    }

    #[test]
    fn every_loaded_date_is_found() {
        let mut repo = PriceRepository::default();
        let raw: Vec<RawObservation> = (1..=28)
            .map(|day| RawObservation::new(format!("02/{day:02}/2024"), 100.0 + day as f64))
            .collect();
        repo.load_series(Symbol::Sol, raw.clone()).unwrap();

        for r in &raw {
            let found = repo.find_observation_text("SOL", &r.date).unwrap();
            assert!(found.is_some(), "missing {}", r.date);
        }
    }

    #[test]
    fn bad_record_keeps_previous_series() {
        let mut repo = repo_with_btc(69000.0);
        let err = repo
            .load_series(
                Symbol::Btc,
                vec![
                    RawObservation::new("2025-01-01", 90000.0),
                    RawObservation::new("2025-02-01", -3.0),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidObservation(_)));
        assert_eq!(repo.series(Symbol::Btc).unwrap().len(), 3);
        assert!(repo.find_observation(Symbol::Btc, d(2025, 1, 1)).is_none());
    }

    #[test]
    fn bad_date_fails_with_invalid_date() {
        let mut repo = PriceRepository::default();
        let err = repo
            .load_series(Symbol::Bnb, vec![RawObservation::new("13/01/2024", 300.0)])
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(_)));
        assert!(repo.series(Symbol::Bnb).is_none());
    }

    #[test]
    fn reload_replaces_series() {
        let mut repo = repo_with_btc(69000.0);
        repo.load_series(Symbol::Btc, vec![RawObservation::new("2025-01-01", 90000.0)])
            .unwrap();
        assert!(repo.find_observation(Symbol::Btc, d(2024, 1, 1)).is_none());
        assert_eq!(repo.find_observation(Symbol::Btc, d(2025, 1, 1)).unwrap().price, 90000.0);
        // Current price has its own lifecycle
        assert_eq!(repo.current_price(Symbol::Btc), Some(69000.0));
    }

    #[test]
    fn duplicate_dates_rejected_by_default() {
        let mut repo = PriceRepository::default();
        let err = repo
            .load_series(
                Symbol::Btc,
                vec![
                    RawObservation::new("2024-01-01", 40000.0),
                    RawObservation::new("01/01/2024", 41000.0),
                ],
            )
            .unwrap_err();
        match err {
            CoreError::InvalidObservation(msg) => assert!(msg.contains("2024-01-01")),
            other => panic!("Expected InvalidObservation, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_dates_last_write_wins() {
        let mut repo = PriceRepository::new(Settings {
            duplicate_policy: DuplicatePolicy::LastWriteWins,
            ..Settings::default()
        });
        let count = repo
            .load_series(
                Symbol::Btc,
                vec![
                    RawObservation::new("2024-01-01", 40000.0),
                    RawObservation::new("01/01/2024", 41000.0),
                ],
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(repo.find_observation(Symbol::Btc, d(2024, 1, 1)).unwrap().price, 41000.0);
    }

    #[test]
    fn monthly_granularity_matches_any_day_in_month() {
        let mut repo = PriceRepository::new(Settings::monthly());
        repo.load_series(Symbol::Ether, vec![RawObservation::new("03/01/2024", 3500.0)])
            .unwrap();
        let obs = repo.find_observation(Symbol::Ether, d(2024, 3, 17)).unwrap();
        assert_eq!(obs.date, d(2024, 3, 1));
        assert_eq!(obs.price, 3500.0);
        assert!(repo.find_observation(Symbol::Ether, d(2024, 4, 1)).is_none());
    }

    #[test]
    fn monthly_granularity_collapses_same_month_as_duplicate() {
        let mut repo = PriceRepository::new(Settings {
            granularity: Granularity::Monthly,
            duplicate_policy: DuplicatePolicy::Reject,
        });
        let err = repo
            .load_series(
                Symbol::Ether,
                vec![
                    RawObservation::new("2024-03-01", 3500.0),
                    RawObservation::new("2024-03-15", 3600.0),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidObservation(_)));
    }

    #[test]
    fn load_series_json() {
        let mut repo = PriceRepository::default();
        let json = r#"[
            {"date": "01/01/2024", "price": 302.1},
            {"date": "02/01/2024", "price": "315.4"}
        ]"#;
        assert_eq!(repo.load_series_json(Symbol::Bnb, json).unwrap(), 2);
        assert_eq!(repo.find_observation(Symbol::Bnb, d(2024, 2, 1)).unwrap().price, 315.4);
    }

    #[test]
    fn load_series_json_malformed() {
        let mut repo = PriceRepository::default();
        let err = repo.load_series_json(Symbol::Bnb, "{\"date\": 1}").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn load_series_json_bad_record_shapes() {
        let cases = [
            r#"[{"date": "2024-01-01"}]"#,
            r#"[{"price": 5}]"#,
            r#"[{"date": 20240101, "price": 5}]"#,
            r#"[{"date": "2024-01-01", "price": null}]"#,
            r#"[{"date": "2024-01-01", "price": 5}, "oops"]"#,
        ];
        for json in cases {
            let mut repo = PriceRepository::default();
            match repo.load_series_json(Symbol::Bnb, json) {
                Err(CoreError::InvalidObservation(_)) => {}
                other => panic!("Expected InvalidObservation for {json}, got {:?}", other),
            }
            assert!(repo.series(Symbol::Bnb).is_none());
        }
    }

    #[test]
    fn set_current_price_validates() {
        let mut repo = PriceRepository::default();
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                repo.set_current_price(Symbol::Sol, bad),
                Err(CoreError::InvalidPrice { .. })
            ));
        }
        assert_eq!(repo.current_price(Symbol::Sol), None);

        repo.set_current_price(Symbol::Sol, 175.0).unwrap();
        repo.set_current_price(Symbol::Sol, 180.0).unwrap();
        assert_eq!(repo.current_price(Symbol::Sol), Some(180.0));
    }

    #[test]
    fn symbols_and_clear() {
        let mut repo = repo_with_btc(69000.0);
        repo.load_series(Symbol::Bnb, vec![RawObservation::new("2024-01-01", 300.0)])
            .unwrap();
        assert_eq!(repo.symbols(), vec![Symbol::Btc, Symbol::Bnb]);

        repo.clear();
        assert!(repo.symbols().is_empty());
        assert_eq!(repo.current_price(Symbol::Btc), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ReturnCalculator
// ═══════════════════════════════════════════════════════════════════

mod calculator {
    use super::*;

    fn run(repo: &PriceRepository, date: NaiveDate, amount: f64) -> Result<InvestmentResult, CoreError> {
        ReturnCalculator::new().calculate(repo, &InvestmentQuery::new(Symbol::Btc, date, amount))
    }

    #[test]
    fn profit_scenario() {
        let repo = repo_with_btc(69000.0);
        let r = run(&repo, d(2024, 1, 1), 1000.0).unwrap();
        assert!(approx(r.asset_amount_purchased, 0.025));
        assert!(approx(r.current_value_usd, 1725.0));
        assert!(approx(r.profit_loss_usd, 725.0));
        assert!(approx(r.profit_loss_percent, 72.5));
        assert_eq!(r.outcome(), Outcome::Profit);
    }

    #[test]
    fn loss_scenario() {
        let repo = repo_with_btc(30000.0);
        let r = run(&repo, d(2024, 1, 1), 1000.0).unwrap();
        assert!(approx(r.current_value_usd, 750.0));
        assert!(approx(r.profit_loss_usd, -250.0));
        assert!(approx(r.profit_loss_percent, -25.0));
        assert_eq!(r.outcome(), Outcome::Loss);
    }

    #[test]
    fn break_even_is_profit() {
        let repo = repo_with_btc(40000.0);
        let r = run(&repo, d(2024, 1, 1), 1000.0).unwrap();
        assert!(approx(r.profit_loss_usd, 0.0));
        assert_eq!(r.outcome(), Outcome::Profit);
    }

    #[test]
    fn result_fields_are_consistent() {
        let repo = repo_with_btc(68123.45);
        for (date, hist) in [(d(2024, 1, 1), 40000.0), (d(2024, 2, 1), 43000.0), (d(2024, 3, 1), 61000.0)] {
            for amount in [0.01, 1.0, 333.33, 1_000_000.0] {
                let r = run(&repo, date, amount).unwrap();
                assert!(approx(r.asset_amount_purchased, amount / hist));
                assert!(approx(r.current_value_usd, r.asset_amount_purchased * 68123.45));
                assert!(approx(r.profit_loss_usd, r.current_value_usd - amount));
                assert!(approx(r.profit_loss_percent, 100.0 * r.profit_loss_usd / amount));
            }
        }
    }

    #[test]
    fn invalid_amounts() {
        let repo = repo_with_btc(69000.0);
        for amount in [0.0, -0.0, -1000.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            match run(&repo, d(2024, 1, 1), amount) {
                Err(CoreError::InvalidAmount(_)) => {}
                other => panic!("Expected InvalidAmount for {amount}, got {:?}", other),
            }
        }
    }

    #[test]
    fn missing_date_is_no_historical_data() {
        let repo = repo_with_btc(69000.0);
        match run(&repo, d(2024, 1, 15), 1000.0) {
            Err(CoreError::NoHistoricalData { symbol, date }) => {
                assert_eq!(symbol, "BTC");
                assert_eq!(date, "2024-01-15");
            }
            other => panic!("Expected NoHistoricalData, got {:?}", other),
        }
    }

    #[test]
    fn missing_current_price() {
        let mut repo = PriceRepository::default();
        repo.load_series(Symbol::Btc, btc_series()).unwrap();
        match run(&repo, d(2024, 1, 1), 1000.0) {
            Err(CoreError::NoCurrentPrice(symbol)) => assert_eq!(symbol, "BTC"),
            other => panic!("Expected NoCurrentPrice, got {:?}", other),
        }
    }

    #[test]
    fn tiny_historical_price_is_not_infinite_units() {
        let mut repo = PriceRepository::default();
        repo.load_series(Symbol::Btc, vec![RawObservation::new("2024-01-01", 5e-324)])
            .unwrap();
        repo.set_current_price(Symbol::Btc, 69000.0).unwrap();
        match run(&repo, d(2024, 1, 1), 1000.0) {
            Err(CoreError::DivisionByZero { symbol, .. }) => assert_eq!(symbol, "BTC"),
            other => panic!("Expected DivisionByZero, got {:?}", other),
        }
    }

    #[test]
    fn huge_value_is_overflow_not_infinity() {
        let mut repo = PriceRepository::default();
        repo.load_series(Symbol::Btc, vec![RawObservation::new("2024-01-01", 0.5)])
            .unwrap();
        repo.set_current_price(Symbol::Btc, 1e300).unwrap();
        match run(&repo, d(2024, 1, 1), 1e300) {
            Err(CoreError::Overflow { symbol, amount_usd }) => {
                assert_eq!(symbol, "BTC");
                assert_eq!(amount_usd, 1e300);
            }
            other => panic!("Expected Overflow, got {:?}", other),
        }
    }

    #[test]
    fn monthly_repository_serves_mid_month_query() {
        let mut repo = PriceRepository::new(Settings::monthly());
        repo.load_series(Symbol::Btc, btc_series()).unwrap();
        repo.set_current_price(Symbol::Btc, 69000.0).unwrap();
        let r = run(&repo, d(2024, 1, 20), 1000.0).unwrap();
        assert!(approx(r.profit_loss_percent, 72.5));
    }
}
