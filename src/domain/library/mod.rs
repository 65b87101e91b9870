//! Frozen function library.
//!
//! Every function maps a close-price series to a binary regime series of the
//! same length. The registry is built once at orchestrator construction and
//! never mutated afterwards, so it is safe for any number of concurrent
//! readers.

pub mod helpers;
pub mod momentum;
pub mod trend;
pub mod volatility;

use crate::domain::blueprint::StepArgs;
use crate::domain::error::RegimixError;
use std::collections::HashMap;

/// Contract for a frozen regime function.
///
/// Input: close prices (validated by the pre-check). Output: one value per
/// input sample, restricted to {0, 1} (enforced by the post-check).
pub trait RegimeFunction: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError>;
}

/// Fixed name-to-function mapping.
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Box<dyn RegimeFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let entries: Vec<Box<dyn RegimeFunction>> = vec![
            Box::new(trend::SmaCrossover),
            Box::new(trend::PriceAboveSma),
            Box::new(volatility::BollingerSqueeze),
            Box::new(volatility::AtrExpansion),
            Box::new(momentum::RsiOverbought),
            Box::new(momentum::RsiOversold),
        ];

        let mut functions = HashMap::new();
        for entry in entries {
            let name = entry.name();
            functions.insert(name, entry);
        }
        Self { functions }
    }

    pub fn get(&self, name: &str) -> Option<&dyn RegimeFunction> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    /// Registered function names, sorted for stable listings.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
