//! Deterministic keyword router.
//!
//! Maps query keywords to fixed blueprints so the pipeline runs without any
//! language model in the loop. An LLM-backed router would implement the same
//! port.

use crate::domain::blueprint::{ExecutionBlueprint, FunctionStep, StepArgs};
use crate::domain::error::RegimixError;
use crate::ports::router_port::IntentRouter;

pub struct KeywordRouter;

impl KeywordRouter {
    fn blueprint(
        steps: Vec<FunctionStep>,
        composition: &str,
        description: &str,
    ) -> ExecutionBlueprint {
        ExecutionBlueprint {
            steps,
            composition: composition.to_string(),
            timeframe: "1d".to_string(),
            assets: vec!["BTC".to_string()],
            description: description.to_string(),
        }
    }
}

impl IntentRouter for KeywordRouter {
    fn parse_intent(&self, query: &str) -> Result<ExecutionBlueprint, RegimixError> {
        let query = query.to_lowercase();

        if query.contains("trend") {
            Ok(Self::blueprint(
                vec![FunctionStep::with_args(
                    "sma_crossover",
                    StepArgs::new()
                        .with("short_window", 20.0)
                        .with("long_window", 50.0),
                )],
                "AND",
                "Trend following via SMA crossover (20/50)",
            ))
        } else if query.contains("volatility") || query.contains("squeeze") {
            Ok(Self::blueprint(
                vec![FunctionStep::with_args(
                    "bollinger_squeeze",
                    StepArgs::new().with("window", 20.0).with("num_std", 2.0),
                )],
                "AND",
                "Volatility consolidation via Bollinger squeeze",
            ))
        } else if query.contains("momentum") || query.contains("rsi") {
            Ok(Self::blueprint(
                vec![
                    FunctionStep::with_args(
                        "rsi_overbought",
                        StepArgs::new().with("threshold", 70.0),
                    ),
                    FunctionStep::with_args(
                        "rsi_oversold",
                        StepArgs::new().with("threshold", 30.0),
                    ),
                ],
                "OR",
                "Momentum extremes via RSI (overbought or oversold)",
            ))
        } else if query.contains("combine") {
            Ok(Self::blueprint(
                vec![
                    FunctionStep::new("sma_crossover"),
                    FunctionStep::new("rsi_oversold"),
                ],
                "AND",
                "Combined: SMA crossover and RSI oversold",
            ))
        } else {
            Ok(Self::blueprint(
                vec![FunctionStep::new("sma_crossover")],
                "AND",
                "Default: SMA crossover",
            ))
        }
    }
}
