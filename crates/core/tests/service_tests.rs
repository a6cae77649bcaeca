// ═══════════════════════════════════════════════════════════════════
// Service Tests — PortfolioService, ValuationService
// ═══════════════════════════════════════════════════════════════════

use apex_wealth_core::errors::CoreError;
use apex_wealth_core::models::holding::Holding;
use apex_wealth_core::models::portfolio::Portfolio;
use apex_wealth_core::services::portfolio_service::PortfolioService;
use apex_wealth_core::services::valuation_service::{profit_pct, ValuationService};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn tickers(portfolio: &Portfolio) -> Vec<String> {
    portfolio.tickers()
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — upsert
// ═══════════════════════════════════════════════════════════════════

mod upsert {
    use super::*;

    #[test]
    fn appends_new_holding() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        let h = svc.upsert(&mut p, "voo", 5.12, 400.0).unwrap();
        assert_eq!(h, Holding::new("VOO", 5.12, 400.0));
        assert_eq!(p.len(), 1);
        assert_eq!(p.holdings[0].last_price, 400.0);
    }

    #[test]
    fn replaces_existing_and_moves_to_end() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        svc.upsert(&mut p, "VOO", 6.0, 420.0).unwrap();
        assert_eq!(tickers(&p), vec!["NVDA", "VOO"]);
        let voo = p.get("VOO").unwrap();
        assert_eq!(voo.shares, 6.0);
        assert_eq!(voo.cost_basis, 420.0);
    }

    #[test]
    fn edit_resets_last_price_to_new_cost() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        assert!(svc.update_price(&mut p, "VOO", 450.0));
        svc.upsert(&mut p, "VOO", 5.12, 405.0).unwrap();
        assert_eq!(p.get("VOO").unwrap().last_price, 405.0);
    }

    #[test]
    fn one_holding_per_ticker_latest_wins() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        let edits = [
            ("VOO", 1.0, 300.0),
            ("NVDA", 2.0, 100.0),
            ("voo", 3.0, 350.0),
            ("AAPL", 4.0, 180.0),
            (" nvda ", 5.0, 110.0),
        ];
        for (t, s, c) in edits {
            svc.upsert(&mut p, t, s, c).unwrap();
        }
        assert_eq!(tickers(&p), vec!["VOO", "AAPL", "NVDA"]);
        assert_eq!(p.get("VOO").unwrap().shares, 3.0);
        assert_eq!(p.get("NVDA").unwrap().shares, 5.0);
    }

    #[test]
    fn zero_quantities_allowed() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        assert!(svc.upsert(&mut p, "GIFT", 10.0, 0.0).is_ok());
        assert!(svc.upsert(&mut p, "WATCH", 0.0, 50.0).is_ok());
    }

    #[test]
    fn empty_ticker_rejected_without_change() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        let err = svc.upsert(&mut p, "   ", 1.0, 1.0).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(p, Portfolio::starter());
    }

    #[test]
    fn negative_or_non_finite_rejected() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        assert!(svc.upsert(&mut p, "VOO", -1.0, 400.0).is_err());
        assert!(svc.upsert(&mut p, "VOO", 1.0, f64::NAN).is_err());
        assert!(svc.upsert(&mut p, "VOO", f64::INFINITY, 1.0).is_err());
        assert_eq!(p, Portfolio::starter());
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — form input
// ═══════════════════════════════════════════════════════════════════

mod form_input {
    use super::*;

    #[test]
    fn parses_text_fields() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        let h = svc.upsert_from_input(&mut p, "nvda", " 10 ", "120.50").unwrap();
        assert_eq!(h.ticker, "NVDA");
        assert_eq!(h.shares, 10.0);
        assert_eq!(h.cost_basis, 120.5);
    }

    #[test]
    fn non_numeric_shares_rejected() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        let err = svc.upsert_from_input(&mut p, "VOO", "five", "400").unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("shares")));
        assert_eq!(p, Portfolio::starter());
    }

    #[test]
    fn non_numeric_cost_rejected() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::new();
        let err = svc.upsert_from_input(&mut p, "VOO", "5", "").unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("cost")));
        assert!(p.is_empty());
    }

    #[test]
    fn parse_amount_rejects_specials() {
        for input in ["NaN", "inf", "-3", "1,000"] {
            assert!(
                PortfolioService::parse_amount("shares", input).is_err(),
                "{input:?} should be rejected"
            );
        }
        assert_eq!(PortfolioService::parse_amount("shares", "0").unwrap(), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — remove / list / update_price
// ═══════════════════════════════════════════════════════════════════

mod remove_and_prices {
    use super::*;

    #[test]
    fn remove_existing() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        assert!(svc.remove(&mut p, "voo"));
        assert_eq!(tickers(&p), vec!["NVDA"]);
        assert!(svc.list(&p).iter().all(|h| h.ticker != "VOO"));
    }

    #[test]
    fn remove_absent_is_noop() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        assert!(!svc.remove(&mut p, "AAPL"));
        assert_eq!(p, Portfolio::starter());
    }

    #[test]
    fn update_price_only_touches_price() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        assert!(svc.update_price(&mut p, "NVDA", 131.0));
        let nvda = p.get("NVDA").unwrap();
        assert_eq!(nvda.last_price, 131.0);
        assert_eq!(nvda.cost_basis, 120.5);
        assert_eq!(nvda.shares, 10.0);
        assert_eq!(tickers(&p), vec!["VOO", "NVDA"]);
    }

    #[test]
    fn update_price_for_removed_ticker_is_noop() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        svc.remove(&mut p, "VOO");
        let before = p.clone();
        assert!(!svc.update_price(&mut p, "VOO", 410.0));
        assert_eq!(p, before);
    }

    #[test]
    fn update_price_rejects_invalid_price() {
        let svc = PortfolioService::new();
        let mut p = Portfolio::starter();
        assert!(!svc.update_price(&mut p, "VOO", f64::NAN));
        assert!(!svc.update_price(&mut p, "VOO", -1.0));
        assert_eq!(p.get("VOO").unwrap().last_price, 400.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// ValuationService
// ═══════════════════════════════════════════════════════════════════

mod valuation {
    use super::*;

    #[test]
    fn worked_example() {
        let holdings = vec![
            Holding::with_last_price("VOO", 5.12, 400.0, 410.0),
            Holding::new("NVDA", 10.0, 120.50),
        ];
        let s = ValuationService::new("USD", "THB").compute_snapshot(&holdings, 34.5);

        assert_close(s.holdings[0].market_value, 2099.2);
        assert_close(s.holdings[0].cost_value, 2048.0);
        assert_close(s.holdings[1].market_value, 1205.0);
        assert_close(s.holdings[1].profit, 0.0);

        assert_close(s.total_market_value, 3304.2);
        assert_close(s.total_cost_value, 3253.0);
        assert_close(s.total_profit, 51.2);
        assert!((s.total_profit_pct - 1.573).abs() < 0.001);
        assert_close(s.display_value, 3304.2 * 34.5);
        assert_eq!(s.fx_rate, 34.5);
        assert_eq!(s.base_currency, "USD");
        assert_eq!(s.display_currency, "THB");
    }

    #[test]
    fn profit_pct_formula_is_exact() {
        let holdings = vec![
            Holding::with_last_price("A", 3.3, 17.1, 19.7),
            Holding::with_last_price("B", 0.7, 1234.5, 999.9),
            Holding::with_last_price("C", 12.0, 0.03, 0.05),
        ];
        let s = ValuationService::default().compute_snapshot(&holdings, 1.0);
        for row in &s.holdings {
            assert!(row.cost_value > 0.0);
            assert_eq!(
                row.profit_pct,
                (row.market_value - row.cost_value) / row.cost_value * 100.0
            );
        }
    }

    #[test]
    fn zero_cost_reports_zero_pct() {
        let holdings = vec![
            Holding::with_last_price("GIFT", 10.0, 0.0, 5.0),
            Holding::with_last_price("NONE", 0.0, 50.0, 60.0),
        ];
        let s = ValuationService::default().compute_snapshot(&holdings, 1.0);
        assert_eq!(s.holdings[0].profit_pct, 0.0);
        assert_eq!(s.holdings[0].profit, 50.0);
        assert_eq!(s.holdings[1].profit_pct, 0.0);
        assert_eq!(s.total_profit_pct, 0.0);
        assert_eq!(profit_pct(10.0, 0.0), 0.0);
    }

    #[test]
    fn empty_portfolio_is_all_zero() {
        let s = ValuationService::default().compute_snapshot(&[], 34.5);
        assert!(s.holdings.is_empty());
        assert_eq!(s.total_market_value, 0.0);
        assert_eq!(s.total_cost_value, 0.0);
        assert_eq!(s.total_profit_pct, 0.0);
        assert_eq!(s.display_value, 0.0);
    }

    #[test]
    fn aggregates_independent_of_order() {
        let mut holdings = vec![
            Holding::with_last_price("A", 1.5, 10.0, 11.0),
            Holding::with_last_price("B", 2.0, 20.0, 19.0),
            Holding::with_last_price("C", 4.0, 7.5, 8.25),
        ];
        let svc = ValuationService::default();
        let forward = svc.compute_snapshot(&holdings, 2.0);
        holdings.reverse();
        let backward = svc.compute_snapshot(&holdings, 2.0);

        let sum_market: f64 = forward.holdings.iter().map(|r| r.market_value).sum();
        let sum_cost: f64 = forward.holdings.iter().map(|r| r.cost_value).sum();
        assert_close(forward.total_market_value, sum_market);
        assert_close(forward.total_cost_value, sum_cost);
        assert_close(forward.total_market_value, backward.total_market_value);
        assert_close(forward.total_cost_value, backward.total_cost_value);
        assert_eq!(backward.holdings[0].ticker, "C");
    }

    #[test]
    fn snapshot_rows_follow_portfolio_order() {
        let s = ValuationService::default().compute_snapshot(&Portfolio::starter().holdings, 1.0);
        let order: Vec<&str> = s.holdings.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["VOO", "NVDA"]);
    }
}
