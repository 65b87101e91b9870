//! Rolling-window helpers shared by the regime functions.
//!
//! NaN marks an incomplete window: a position is NaN until `window` samples
//! are available, and any NaN inside a window poisons it. Callers decide how
//! warmup NaNs are filled (`fill_backward` / `fill_nan`), which is what gives
//! each function its own warmup convention.

/// Rolling mean; positions with fewer than `window` samples are NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = slice.iter().sum::<f64>() / window as f64;
    }
    out
}

/// Rolling sample standard deviation (n - 1 divisor); NaN over warmup.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window < 2 || window > values.len() {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
            / (window - 1) as f64;
        out[i] = var.sqrt();
    }
    out
}

/// Relative change from the previous sample; index 0 is NaN.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] / values[i - 1] - 1.0;
    }
    out
}

/// Fill each NaN with the next non-NaN value; trailing NaNs take `fallback`.
pub fn fill_backward(values: &mut [f64], fallback: f64) {
    let mut next_valid = fallback;
    for v in values.iter_mut().rev() {
        if v.is_nan() {
            *v = next_valid;
        } else {
            next_valid = *v;
        }
    }
}

/// Replace every NaN with `fill`.
pub fn fill_nan(values: &mut [f64], fill: f64) {
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = fill;
        }
    }
}
