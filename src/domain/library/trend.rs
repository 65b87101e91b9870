//! Trend regime functions.

use crate::domain::blueprint::StepArgs;
use crate::domain::error::RegimixError;
use crate::domain::library::RegimeFunction;
use crate::domain::library::helpers::{fill_backward, rolling_mean};

/// 1 where the short SMA sits above the long SMA.
///
/// Warmup: both rolling means are backfilled with their first complete value
/// (0.0 if the window never completes), so the regime is defined from index 0.
pub struct SmaCrossover;

impl RegimeFunction for SmaCrossover {
    fn name(&self) -> &'static str {
        "sma_crossover"
    }

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError> {
        let short_window = args.get_usize("short_window", 20);
        let long_window = args.get_usize("long_window", 50);
        if short_window == 0 || long_window == 0 {
            return Err(RegimixError::Execution {
                function: self.name().to_string(),
                reason: "window must be positive".to_string(),
            });
        }

        let mut short_sma = rolling_mean(prices, short_window);
        let mut long_sma = rolling_mean(prices, long_window);
        fill_backward(&mut short_sma, 0.0);
        fill_backward(&mut long_sma, 0.0);

        Ok(short_sma
            .iter()
            .zip(long_sma.iter())
            .map(|(&s, &l)| if s > l { 1.0 } else { 0.0 })
            .collect())
    }
}

/// 1 where the price sits above its SMA.
pub struct PriceAboveSma;

impl RegimeFunction for PriceAboveSma {
    fn name(&self) -> &'static str {
        "price_above_sma"
    }

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError> {
        let window = args.get_usize("window", 50);
        if window == 0 {
            return Err(RegimixError::Execution {
                function: self.name().to_string(),
                reason: "window must be positive".to_string(),
            });
        }

        let mut sma = rolling_mean(prices, window);
        fill_backward(&mut sma, 0.0);

        Ok(prices
            .iter()
            .zip(sma.iter())
            .map(|(&p, &s)| if p > s { 1.0 } else { 0.0 })
            .collect())
    }
}
