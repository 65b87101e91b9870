//! Hamming distance and the statistical stability predicate.

use crate::domain::error::RegimixError;

/// Fraction of positions allowed to change per smoothing round while still
/// counting as stable.
pub const STABILITY_THRESHOLD: f64 = 0.01;

/// Count of positions where two equal-length series differ.
pub fn hamming_distance(a: &[f64], b: &[f64]) -> Result<usize, RegimixError> {
    if a.len() != b.len() {
        return Err(RegimixError::LengthMismatch {
            reason: format!(
                "hamming distance requires equal lengths, got {} and {}",
                a.len(),
                b.len()
            ),
        });
    }
    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
}

/// True when the distance is within `STABILITY_THRESHOLD` of the length.
pub fn check_stability(distance: usize, len: usize) -> bool {
    distance as f64 <= len as f64 * STABILITY_THRESHOLD
}
