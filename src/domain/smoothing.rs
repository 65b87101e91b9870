//! Majority-vote regime smoothing.

/// Default smoothing window used by the stability loop.
pub const DEFAULT_WINDOW: usize = 3;

/// Smooth a regime series by majority vote over a centered window.
///
/// Each position takes the majority value over `[i - window/2, i + window/2]`
/// clamped to the series bounds; a strict majority of the window sum yields 1.
/// Series shorter than the window are returned unchanged.
pub fn smooth_regime(regime: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || regime.len() < window {
        return regime.to_vec();
    }

    let half = window / 2;
    let mut result = Vec::with_capacity(regime.len());
    for i in 0..regime.len() {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(regime.len());
        let sum: f64 = regime[start..end].iter().sum();
        result.push(if sum > (end - start) as f64 / 2.0 {
            1.0
        } else {
            0.0
        });
    }
    result
}
