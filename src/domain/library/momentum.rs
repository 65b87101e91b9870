//! Momentum regime functions.
//!
//! RSI here uses simple rolling means of gains and losses (not Wilder's
//! smoothing), with the warmup filled at the neutral 50 line. With no losses
//! in the window the gain/loss ratio runs to infinity and RSI saturates at
//! 100; a flat window gives 0/0 and falls back to 50.

use crate::domain::blueprint::StepArgs;
use crate::domain::error::RegimixError;
use crate::domain::library::RegimeFunction;
use crate::domain::library::helpers::rolling_mean;

fn rsi(prices: &[f64], period: usize) -> Vec<f64> {
    let mut gains = vec![0.0; prices.len()];
    let mut losses = vec![0.0; prices.len()];
    for i in 1..prices.len() {
        let delta = prices[i] - prices[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else if delta < 0.0 {
            losses[i] = -delta;
        }
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&g, &l)| {
            let rs = g / l;
            let value = 100.0 - 100.0 / (1.0 + rs);
            if value.is_nan() { 50.0 } else { value }
        })
        .collect()
}

/// 1 where RSI exceeds the overbought threshold.
pub struct RsiOverbought;

impl RegimeFunction for RsiOverbought {
    fn name(&self) -> &'static str {
        "rsi_overbought"
    }

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError> {
        let period = args.get_usize("period", 14);
        let threshold = args.get_f64("threshold", 70.0);
        if period == 0 {
            return Err(RegimixError::Execution {
                function: self.name().to_string(),
                reason: "period must be positive".to_string(),
            });
        }

        Ok(rsi(prices, period)
            .iter()
            .map(|&v| if v > threshold { 1.0 } else { 0.0 })
            .collect())
    }
}

/// 1 where RSI sits below the oversold threshold.
pub struct RsiOversold;

impl RegimeFunction for RsiOversold {
    fn name(&self) -> &'static str {
        "rsi_oversold"
    }

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError> {
        let period = args.get_usize("period", 14);
        let threshold = args.get_f64("threshold", 30.0);
        if period == 0 {
            return Err(RegimixError::Execution {
                function: self.name().to_string(),
                reason: "period must be positive".to_string(),
            });
        }

        Ok(rsi(prices, period)
            .iter()
            .map(|&v| if v < threshold { 1.0 } else { 0.0 })
            .collect())
    }
}
