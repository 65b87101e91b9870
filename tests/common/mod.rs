#![allow(dead_code)]

use regimix::domain::blueprint::{ExecutionBlueprint, FunctionStep, StepArgs};
use regimix::domain::error::RegimixError;
use regimix::ports::data_port::DataPort;
use regimix::ports::router_port::IntentRouter;
use std::collections::HashMap;

pub struct MockDataPort {
    pub series: HashMap<String, Vec<f64>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: Vec<f64>) -> Self {
        self.series.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load(&self, symbol: &str, _timeframe: &str, _limit: usize) -> Result<Vec<f64>, RegimixError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(RegimixError::DataUnavailable {
                asset: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| RegimixError::DataUnavailable {
                asset: symbol.to_string(),
                reason: "no series registered".to_string(),
            })
    }
}

/// Router that always fails, for error-propagation tests.
pub struct FailingRouter;

impl IntentRouter for FailingRouter {
    fn parse_intent(&self, query: &str) -> Result<ExecutionBlueprint, RegimixError> {
        Err(RegimixError::IntentParse {
            reason: format!("cannot route: {query}"),
        })
    }
}

pub fn make_blueprint(names: &[&str], composition: &str, assets: &[&str]) -> ExecutionBlueprint {
    ExecutionBlueprint {
        steps: names.iter().map(|n| FunctionStep::new(n)).collect(),
        composition: composition.to_string(),
        timeframe: "1d".to_string(),
        assets: assets.iter().map(|a| a.to_string()).collect(),
        description: String::new(),
    }
}

pub fn step_with_window(name: &str, key: &str, window: f64) -> FunctionStep {
    FunctionStep::with_args(name, StepArgs::new().with(key, window))
}

/// Strictly rising prices.
pub fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

pub fn constant(n: usize, value: f64) -> Vec<f64> {
    vec![value; n]
}
