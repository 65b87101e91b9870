//! Kernel orchestrator.
//!
//! Drives a blueprint through the validation gate, the frozen registry and
//! the composition engine, per asset and then across assets, and optionally
//! iterates majority-vote smoothing until the regime stabilizes.
//!
//! Any failure anywhere aborts the whole call; no partial result is ever
//! returned. Each call owns its price series, intermediate regimes and
//! history, so independent queries can run concurrently with no coordination.

use crate::domain::blueprint::ExecutionBlueprint;
use crate::domain::compose::compose;
use crate::domain::error::RegimixError;
use crate::domain::library::FunctionRegistry;
use crate::domain::smoothing::{DEFAULT_WINDOW, smooth_regime};
use crate::domain::stability::{check_stability, hamming_distance};
use crate::domain::validation::{post_check, pre_check, stop_hook};
use crate::ports::data_port::DataPort;
use crate::ports::router_port::IntentRouter;
use log::{debug, info};
use serde::Serialize;

/// Asset used when a blueprint names none.
pub const DEFAULT_ASSET: &str = "BTC";

/// Samples fetched per asset per call.
pub const DEFAULT_SERIES_LEN: usize = 100;

/// Smoothing-round cap when the caller does not pick one.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub series_len: usize,
    pub smoothing_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            series_len: DEFAULT_SERIES_LEN,
            smoothing_window: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub regime: Vec<f64>,
    pub blueprint: ExecutionBlueprint,
    pub provenance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StabilityResult {
    pub regime: Vec<f64>,
    pub iterations: usize,
    pub initial_regime: Vec<f64>,
    pub blueprint: ExecutionBlueprint,
    pub provenance: String,
}

pub struct Orchestrator<'a> {
    router: &'a dyn IntentRouter,
    data: &'a dyn DataPort,
    registry: FunctionRegistry,
    config: EngineConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(router: &'a dyn IntentRouter, data: &'a dyn DataPort) -> Self {
        Self::with_config(router, data, EngineConfig::default())
    }

    pub fn with_config(
        router: &'a dyn IntentRouter,
        data: &'a dyn DataPort,
        config: EngineConfig,
    ) -> Self {
        Self {
            router,
            data,
            registry: FunctionRegistry::new(),
            config,
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Route the query to a blueprint and execute it.
    pub fn execute(&self, query: &str) -> Result<ExecutionResult, RegimixError> {
        let blueprint = self.router.parse_intent(query)?;
        let regime = self.run_blueprint(&blueprint)?;

        let asset_count = blueprint.assets.len().max(1);
        let provenance = format!(
            "executed {} step(s) over {} asset(s)",
            blueprint.steps.len(),
            asset_count
        );
        info!(
            "query executed: {} step(s), {} asset(s), {} composition",
            blueprint.steps.len(),
            asset_count,
            blueprint.composition
        );

        Ok(ExecutionResult {
            regime,
            blueprint,
            provenance,
        })
    }

    /// Execute, then smooth repeatedly until the regime stops moving.
    ///
    /// Two stop criteria run independently every round: the stop hook (cap
    /// reached or distance exactly zero) and the statistical predicate
    /// (distance within 1% of the series length). Either ends the loop, so
    /// termination is guaranteed by the cap alone.
    pub fn run_until_stable(
        &self,
        query: &str,
        max_iterations: usize,
    ) -> Result<StabilityResult, RegimixError> {
        let result = self.execute(query)?;
        let initial_regime = result.regime.clone();
        let mut history = vec![result.regime];

        for k in 1..=max_iterations {
            let prev = &history[history.len() - 1];
            let next = smooth_regime(prev, self.config.smoothing_window);
            let distance = hamming_distance(prev, &next)?;
            let stable = check_stability(distance, prev.len());
            debug!("smoothing round {k}: hamming distance {distance}");
            history.push(next);

            if stop_hook(k, max_iterations, distance) || stable {
                break;
            }
        }

        let iterations = history.len() - 1;
        info!("regime settled after {iterations} smoothing round(s)");

        Ok(StabilityResult {
            regime: history.pop().unwrap_or_default(),
            iterations,
            initial_regime,
            blueprint: result.blueprint,
            provenance: format!("stable after {iterations} smoothing iteration(s)"),
        })
    }

    fn run_blueprint(&self, blueprint: &ExecutionBlueprint) -> Result<Vec<f64>, RegimixError> {
        let default_assets = [DEFAULT_ASSET.to_string()];
        let assets: &[String] = if blueprint.assets.is_empty() {
            &default_assets
        } else {
            &blueprint.assets
        };

        let mut asset_regimes = Vec::with_capacity(assets.len());
        for asset in assets {
            let prices = self.resolve_asset(asset, &blueprint.timeframe)?;
            asset_regimes.push(self.run_steps(blueprint, &prices)?);
        }

        compose(&asset_regimes, &blueprint.composition)
    }

    /// Run every step of the blueprint over one price series and fold the
    /// outputs with the blueprint's composition mode.
    fn run_steps(
        &self,
        blueprint: &ExecutionBlueprint,
        prices: &[f64],
    ) -> Result<Vec<f64>, RegimixError> {
        let mut outputs = Vec::with_capacity(blueprint.steps.len());
        for step in &blueprint.steps {
            let function =
                self.registry
                    .get(&step.function_name)
                    .ok_or_else(|| RegimixError::UnknownFunction {
                        name: step.function_name.clone(),
                    })?;

            pre_check(&step.function_name, prices)?;
            let output = function.evaluate(prices, &step.args)?;
            post_check(&step.function_name, &output, prices.len())?;

            debug!("step {} produced {} samples", step.function_name, output.len());
            outputs.push(output);
        }

        compose(&outputs, &blueprint.composition)
    }

    /// Expand an asset identifier into a price series.
    ///
    /// "X-Y" (a separator, no whitespace) is a synthetic pair: both legs are
    /// fetched and the elementwise difference returned. Unequal legs fail
    /// here, before any step runs.
    fn resolve_asset(&self, asset: &str, timeframe: &str) -> Result<Vec<f64>, RegimixError> {
        let limit = self.config.series_len;
        match split_pair(asset) {
            Some((base, quote)) => {
                debug!("resolving synthetic pair {base} minus {quote}");
                let base_series = self.data.load(base, timeframe, limit)?;
                let quote_series = self.data.load(quote, timeframe, limit)?;
                if base_series.len() != quote_series.len() {
                    return Err(RegimixError::DataUnavailable {
                        asset: asset.to_string(),
                        reason: format!(
                            "leg lengths differ: {} vs {}",
                            base_series.len(),
                            quote_series.len()
                        ),
                    });
                }
                Ok(base_series
                    .iter()
                    .zip(quote_series.iter())
                    .map(|(b, q)| b - q)
                    .collect())
            }
            None => self.data.load(asset, timeframe, limit),
        }
    }
}

fn split_pair(asset: &str) -> Option<(&str, &str)> {
    if asset.contains(char::is_whitespace) {
        return None;
    }
    asset
        .split_once('-')
        .filter(|(base, quote)| !base.is_empty() && !quote.is_empty())
}
