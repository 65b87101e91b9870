//! Volatility regime functions.

use crate::domain::blueprint::StepArgs;
use crate::domain::error::RegimixError;
use crate::domain::library::RegimeFunction;
use crate::domain::library::helpers::{fill_nan, pct_change, rolling_mean, rolling_std};

/// 1 where Bollinger bandwidth drops below the squeeze threshold.
///
/// Bandwidth is `(upper - lower) / middle` with a sample-std band. Warmup
/// positions take bandwidth 1.0 so they never read as a squeeze.
pub struct BollingerSqueeze;

impl RegimeFunction for BollingerSqueeze {
    fn name(&self) -> &'static str {
        "bollinger_squeeze"
    }

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError> {
        let window = args.get_usize("window", 20);
        let num_std = args.get_f64("num_std", 2.0);
        let threshold = args.get_f64("squeeze_threshold", 0.05);
        if window < 2 {
            return Err(RegimixError::Execution {
                function: self.name().to_string(),
                reason: "window must be at least 2".to_string(),
            });
        }

        let sma = rolling_mean(prices, window);
        let std = rolling_std(prices, window);

        let mut bandwidth: Vec<f64> = sma
            .iter()
            .zip(std.iter())
            .map(|(&m, &s)| 2.0 * num_std * s / m)
            .collect();
        fill_nan(&mut bandwidth, 1.0);

        Ok(bandwidth
            .iter()
            .map(|&b| if b < threshold { 1.0 } else { 0.0 })
            .collect())
    }
}

/// 1 where realized volatility is rising above its own moving average.
///
/// Volatility is the rolling std of percent changes; the baseline is its
/// rolling mean over twice the window. Both are zero-filled over warmup, so
/// the regime reads 1 between the two warmups whenever volatility is
/// positive.
pub struct AtrExpansion;

impl RegimeFunction for AtrExpansion {
    fn name(&self) -> &'static str {
        "atr_expansion"
    }

    fn evaluate(&self, prices: &[f64], args: &StepArgs) -> Result<Vec<f64>, RegimixError> {
        let window = args.get_usize("window", 14);
        if window < 2 {
            return Err(RegimixError::Execution {
                function: self.name().to_string(),
                reason: "window must be at least 2".to_string(),
            });
        }

        let returns = pct_change(prices);
        let mut vol = rolling_std(&returns, window);
        let mut vol_sma = rolling_mean(&vol, window * 2);
        fill_nan(&mut vol, 0.0);
        fill_nan(&mut vol_sma, 0.0);

        Ok(vol
            .iter()
            .zip(vol_sma.iter())
            .map(|(&v, &base)| if v > base { 1.0 } else { 0.0 })
            .collect())
    }
}
