//! Validation gate around every function call.
//!
//! Three pure checkpoints: `pre_check` before a regime function runs,
//! `post_check` on what it returned, and `stop_hook` guarding the stability
//! loop's termination. None of them mutate anything; they only reject.

use crate::domain::error::RegimixError;

/// Reject price input that is not a finite numeric series of length >= 2.
pub fn pre_check(function: &str, prices: &[f64]) -> Result<(), RegimixError> {
    if prices.len() < 2 {
        return Err(RegimixError::InvalidInput {
            function: function.to_string(),
            reason: format!("need at least 2 samples, got {}", prices.len()),
        });
    }
    if let Some(i) = prices.iter().position(|p| !p.is_finite()) {
        return Err(RegimixError::InvalidInput {
            function: function.to_string(),
            reason: format!("non-finite value at index {i}"),
        });
    }
    Ok(())
}

/// Reject function output that is misaligned with its input or non-binary.
pub fn post_check(function: &str, output: &[f64], input_len: usize) -> Result<(), RegimixError> {
    if output.len() != input_len {
        return Err(RegimixError::InvalidOutput {
            function: function.to_string(),
            reason: format!(
                "output length {} does not match input length {}",
                output.len(),
                input_len
            ),
        });
    }
    if let Some(i) = output.iter().position(|&v| v != 0.0 && v != 1.0) {
        return Err(RegimixError::InvalidOutput {
            function: function.to_string(),
            reason: format!("non-binary value {} at index {}", output[i], i),
        });
    }
    Ok(())
}

/// Stop decision for the stability loop.
///
/// Stops once the iteration cap is reached, or when the regime did not move
/// at all this round. The exact-zero criterion is independent of the
/// percentage-based stability predicate evaluated alongside it.
pub fn stop_hook(iteration: usize, max_iterations: usize, hamming_distance: usize) -> bool {
    iteration >= max_iterations || hamming_distance == 0
}
