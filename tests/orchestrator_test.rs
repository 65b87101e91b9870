//! End-to-end orchestrator tests.
//!
//! Tests cover:
//! - Full pipeline with the keyword router and synthetic data
//! - Per-step gate and registry failures aborting the whole call
//! - Multi-asset aggregation (SUM breadth, synthetic pairs, leg mismatches)
//! - The stability loop's dual stop criteria and iteration accounting

mod common;

use common::*;
use regimix::adapters::keyword_router::KeywordRouter;
use regimix::adapters::static_router::StaticRouter;
use regimix::adapters::synthetic_adapter::SyntheticDataAdapter;
use regimix::domain::blueprint::{ExecutionBlueprint, FunctionStep, StepArgs};
use regimix::domain::engine::Orchestrator;
use regimix::domain::error::RegimixError;
use regimix::domain::library::RegimeFunction;
use regimix::domain::library::trend::PriceAboveSma;

mod execute_pipeline {
    use super::*;

    #[test]
    fn trend_query_end_to_end() {
        let router = KeywordRouter;
        let data = SyntheticDataAdapter::new();
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("Show me the trend of BTC").unwrap();

        assert_eq!(result.regime.len(), 100);
        assert!(result.regime.iter().all(|&v| v == 0.0 || v == 1.0));
        assert_eq!(
            result.blueprint.description,
            "Trend following via SMA crossover (20/50)"
        );
        assert!(result.provenance.contains("1 step(s)"));
    }

    #[test]
    fn default_asset_used_when_blueprint_names_none() {
        let blueprint = make_blueprint(&["price_above_sma"], "AND", &[]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("BTC", ramp(60));
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("anything").unwrap();
        assert_eq!(result.regime.len(), 60);
    }

    #[test]
    fn empty_steps_yield_empty_regime() {
        let blueprint = make_blueprint(&[], "AND", &["A"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", ramp(50));
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("anything").unwrap();
        assert!(result.regime.is_empty());
    }

    #[test]
    fn unknown_function_aborts_the_call() {
        let blueprint = make_blueprint(&["macd_cross"], "AND", &["A"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", ramp(50));
        let orchestrator = Orchestrator::new(&router, &data);

        match orchestrator.execute("anything") {
            Err(RegimixError::UnknownFunction { name }) => assert_eq!(name, "macd_cross"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_composition_rejected_with_two_steps() {
        let blueprint = make_blueprint(&["sma_crossover", "price_above_sma"], "NAND", &["A"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", ramp(60));
        let orchestrator = Orchestrator::new(&router, &data);

        assert!(matches!(
            orchestrator.execute("anything"),
            Err(RegimixError::UnknownComposition { .. })
        ));
    }

    #[test]
    fn single_step_bypasses_composition_mode() {
        // one step, one asset: nothing is folded, so the mode is never parsed
        let blueprint = make_blueprint(&["price_above_sma"], "NAND", &["A"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", ramp(60));
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("anything").unwrap();
        assert!(result.regime.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn single_step_multi_asset_still_checks_mode() {
        let blueprint = make_blueprint(&["price_above_sma"], "NAND", &["A", "B"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new()
            .with_series("A", ramp(60))
            .with_series("B", ramp(60));
        let orchestrator = Orchestrator::new(&router, &data);

        assert!(matches!(
            orchestrator.execute("anything"),
            Err(RegimixError::UnknownComposition { .. })
        ));
    }

    #[test]
    fn data_error_aborts_the_call() {
        let blueprint = make_blueprint(&["price_above_sma"], "AND", &["BTC"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_error("BTC", "exchange offline");
        let orchestrator = Orchestrator::new(&router, &data);

        assert!(matches!(
            orchestrator.execute("anything"),
            Err(RegimixError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn pre_check_rejects_short_series_before_any_function_runs() {
        let blueprint = make_blueprint(&["price_above_sma"], "AND", &["A"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", vec![100.0]);
        let orchestrator = Orchestrator::new(&router, &data);

        match orchestrator.execute("anything") {
            Err(RegimixError::InvalidInput { function, .. }) => {
                assert_eq!(function, "price_above_sma");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn pre_check_rejects_nan_prices() {
        let blueprint = make_blueprint(&["price_above_sma"], "AND", &["A"]);
        let router = StaticRouter::new(blueprint);
        let mut prices = ramp(50);
        prices[25] = f64::NAN;
        let data = MockDataPort::new().with_series("A", prices);
        let orchestrator = Orchestrator::new(&router, &data);

        assert!(matches!(
            orchestrator.execute("anything"),
            Err(RegimixError::InvalidInput { .. })
        ));
    }

    #[test]
    fn function_failure_is_wrapped_with_its_name() {
        let blueprint = ExecutionBlueprint {
            steps: vec![FunctionStep::with_args(
                "sma_crossover",
                StepArgs::new().with("short_window", 0.0),
            )],
            composition: "AND".into(),
            timeframe: "1d".into(),
            assets: vec!["A".into()],
            description: String::new(),
        };
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", ramp(60));
        let orchestrator = Orchestrator::new(&router, &data);

        match orchestrator.execute("anything") {
            Err(err @ RegimixError::Execution { .. }) => {
                assert!(err.to_string().contains("sma_crossover"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn router_failure_is_fatal() {
        let router = FailingRouter;
        let data = SyntheticDataAdapter::new();
        let orchestrator = Orchestrator::new(&router, &data);

        assert!(matches!(
            orchestrator.execute("trend"),
            Err(RegimixError::IntentParse { .. })
        ));
        assert!(matches!(
            orchestrator.run_until_stable("trend", 5),
            Err(RegimixError::IntentParse { .. })
        ));
    }
}

mod multi_asset {
    use super::*;

    #[test]
    fn sum_breadth_across_three_assets() {
        let blueprint = ExecutionBlueprint {
            steps: vec![step_with_window("price_above_sma", "window", 10.0)],
            composition: "SUM".into(),
            timeframe: "1d".into(),
            assets: vec!["A".into(), "B".into(), "C".into()],
            description: String::new(),
        };
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new()
            .with_series("A", ramp(100))
            .with_series("B", ramp(100).iter().map(|p| p + 50.0).collect())
            .with_series("C", constant(100, 80.0));
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("breadth").unwrap();

        assert_eq!(result.regime.len(), 100);
        assert!(result.regime.iter().all(|&v| (0.0..=3.0).contains(&v)));
        // rising assets agree after warmup, the flat one never votes
        assert_eq!(*result.regime.last().unwrap(), 2.0);
    }

    #[test]
    fn synthetic_pair_resolves_to_elementwise_difference() {
        let a = ramp(100);
        let b = constant(100, 50.0);
        let diff: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x - y).collect();

        let blueprint = ExecutionBlueprint {
            steps: vec![step_with_window("price_above_sma", "window", 10.0)],
            composition: "AND".into(),
            timeframe: "1d".into(),
            assets: vec!["A-B".into()],
            description: String::new(),
        };
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", a).with_series("B", b);
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("synthetic").unwrap();

        let args = StepArgs::new().with("window", 10.0);
        let expected = PriceAboveSma.evaluate(&diff, &args).unwrap();
        assert_eq!(result.regime, expected);
    }

    #[test]
    fn mismatched_pair_legs_fail_before_any_step() {
        let blueprint = make_blueprint(&["price_above_sma"], "AND", &["A-B"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new()
            .with_series("A", ramp(100))
            .with_series("B", ramp(80));
        let orchestrator = Orchestrator::new(&router, &data);

        match orchestrator.execute("synthetic") {
            Err(RegimixError::DataUnavailable { asset, reason }) => {
                assert_eq!(asset, "A-B");
                assert!(reason.contains("100"));
                assert!(reason.contains("80"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_pair_leg_aborts() {
        let blueprint = make_blueprint(&["price_above_sma"], "AND", &["A-B"]);
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new().with_series("A", ramp(100));
        let orchestrator = Orchestrator::new(&router, &data);

        assert!(matches!(
            orchestrator.execute("synthetic"),
            Err(RegimixError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn and_across_assets_requires_agreement() {
        let blueprint = ExecutionBlueprint {
            steps: vec![step_with_window("price_above_sma", "window", 10.0)],
            composition: "AND".into(),
            timeframe: "1d".into(),
            assets: vec!["UP".into(), "FLAT".into()],
            description: String::new(),
        };
        let router = StaticRouter::new(blueprint);
        let data = MockDataPort::new()
            .with_series("UP", ramp(100))
            .with_series("FLAT", constant(100, 80.0));
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.execute("anything").unwrap();
        // the flat asset never signals, so the conjunction is empty
        assert!(result.regime.iter().all(|&v| v == 0.0));
    }
}

mod stability_loop {
    use super::*;

    /// Alternating prices around a flat mean: with window 2 the regime is a
    /// checkerboard that keeps flipping under majority vote.
    fn checkerboard_port(symbol: &str, n: usize) -> MockDataPort {
        let prices: Vec<f64> = (0..n)
            .map(|i| if i % 2 == 0 { 99.0 } else { 101.0 })
            .collect();
        MockDataPort::new().with_series(symbol, prices)
    }

    fn uptick_blueprint(assets: &[&str]) -> ExecutionBlueprint {
        ExecutionBlueprint {
            steps: vec![step_with_window("price_above_sma", "window", 2.0)],
            composition: "AND".into(),
            timeframe: "1d".into(),
            assets: assets.iter().map(|a| a.to_string()).collect(),
            description: String::new(),
        }
    }

    #[test]
    fn iteration_cap_always_terminates_the_loop() {
        let router = StaticRouter::new(uptick_blueprint(&["X"]));
        let data = checkerboard_port("X", 100);
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.run_until_stable("anything", 5).unwrap();

        assert_eq!(result.iterations, 5);
        assert_eq!(result.regime.len(), 100);
        assert!(result.provenance.contains('5'));
    }

    #[test]
    fn zero_distance_stops_after_one_iteration() {
        // constant prices: all-zero regime, first smoothing changes nothing
        let router = StaticRouter::new(make_blueprint(&["price_above_sma"], "AND", &["X"]));
        let data = MockDataPort::new().with_series("X", constant(100, 100.0));
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.run_until_stable("anything", 5).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.regime, result.initial_regime);
    }

    #[test]
    fn statistical_stability_stops_before_exact_convergence() {
        // rising prices with a single down-tick: the regime is 1 everywhere
        // except index 0 (price below its backfilled mean) and the dip; the
        // first smoothing round removes the dip but leaves the edge, so the
        // distance is 1: not yet zero, but within the 1% band for length 100
        let mut prices: Vec<f64> = (0..100).map(|i| i as f64).collect();
        prices[50] = 48.5;
        let router = StaticRouter::new(uptick_blueprint(&["X"]));
        let data = MockDataPort::new().with_series("X", prices);
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.run_until_stable("anything", 10).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.initial_regime.iter().filter(|&&v| v == 0.0).count(), 2);
        assert_eq!(result.initial_regime[50], 0.0);
        assert_eq!(result.regime[50], 1.0);
        assert_eq!(result.regime.iter().filter(|&&v| v == 0.0).count(), 1);
    }

    #[test]
    fn zero_max_iterations_returns_the_initial_regime() {
        let router = StaticRouter::new(uptick_blueprint(&["X"]));
        let data = checkerboard_port("X", 100);
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator.run_until_stable("anything", 0).unwrap();

        assert_eq!(result.iterations, 0);
        assert_eq!(result.regime, result.initial_regime);
    }

    #[test]
    fn stability_result_echoes_the_blueprint() {
        let router = KeywordRouter;
        let data = SyntheticDataAdapter::new();
        let orchestrator = Orchestrator::new(&router, &data);

        let result = orchestrator
            .run_until_stable("Show me the trend of BTC", 5)
            .unwrap();

        assert!(result.iterations <= 5);
        assert_eq!(result.blueprint.steps[0].function_name, "sma_crossover");
        assert_eq!(result.initial_regime.len(), result.regime.len());
    }
}
