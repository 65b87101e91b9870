//! Execution blueprint data model.
//!
//! A blueprint is the structured plan a router derives from a query: which
//! regime functions to run, how to fold their outputs, and over which assets.
//! Blueprints are built once per query and read-only afterwards.

use crate::domain::error::RegimixError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named numeric arguments for a function step.
///
/// All step parameters (windows, thresholds, multipliers) are numeric, so a
/// single f64 map covers them; accessors take a default the same way the
/// config port does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepArgs(HashMap<String, f64>);

impl StepArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        match self.0.get(key) {
            Some(&v) if v >= 0.0 => v as usize,
            Some(_) => default,
            None => default,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single function call in the blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionStep {
    pub function_name: String,
    #[serde(default)]
    pub args: StepArgs,
    /// Reserved for weighted combinations; unused by composition.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl FunctionStep {
    pub fn new(function_name: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            args: StepArgs::new(),
            weight: 1.0,
        }
    }

    pub fn with_args(function_name: &str, args: StepArgs) -> Self {
        Self {
            args,
            ..Self::new(function_name)
        }
    }
}

/// Structured plan for executing a query.
///
/// The composition field stays a string here; it is parsed by the fold, not
/// at construction, so an unknown mode only surfaces when it is actually
/// applied to two or more series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionBlueprint {
    pub steps: Vec<FunctionStep>,
    #[serde(default = "default_composition")]
    pub composition: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub description: String,
}

fn default_composition() -> String {
    "AND".to_string()
}

fn default_timeframe() -> String {
    "1d".to_string()
}

/// Logic-gate mode used to fold regime series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    And,
    Or,
    Xor,
    Average,
    Sum,
}

impl Composition {
    pub fn parse(mode: &str) -> Result<Self, RegimixError> {
        match mode {
            "AND" => Ok(Composition::And),
            "OR" => Ok(Composition::Or),
            "XOR" => Ok(Composition::Xor),
            "AVERAGE" => Ok(Composition::Average),
            "SUM" => Ok(Composition::Sum),
            _ => Err(RegimixError::UnknownComposition {
                mode: mode.to_string(),
            }),
        }
    }
}
