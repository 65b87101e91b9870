//! Composition engine: folds regime series through a logic gate.
//!
//! # Fold Semantics
//!
//! - `AND`/`OR`/`XOR`: pairwise boolean op over truthiness (x != 0), output
//!   restricted to {0, 1}
//! - `SUM`: pairwise addition, unbounded above by the input count
//! - `AVERAGE`: running pairwise mean; each fold step averages the
//!   accumulator with the next element, so for more than two inputs the
//!   result is recency-weighted rather than a true N-way mean
//!
//! An empty list folds to an empty series. A single-element list is returned
//! unchanged before the mode string is even looked at, so an unknown mode is
//! only rejected when there are two or more series to fold.

use crate::domain::blueprint::Composition;
use crate::domain::error::RegimixError;

pub fn compose(series: &[Vec<f64>], mode: &str) -> Result<Vec<f64>, RegimixError> {
    if series.is_empty() {
        return Ok(Vec::new());
    }
    if series.len() == 1 {
        return Ok(series[0].clone());
    }

    let gate = Composition::parse(mode)?;

    let mut combined = series[0].clone();
    for next in &series[1..] {
        if next.len() != combined.len() {
            return Err(RegimixError::LengthMismatch {
                reason: format!(
                    "cannot fold series of length {} into series of length {}",
                    next.len(),
                    combined.len()
                ),
            });
        }
        combined = combined
            .iter()
            .zip(next.iter())
            .map(|(&acc, &x)| apply(gate, acc, x))
            .collect();
    }

    Ok(combined)
}

fn apply(gate: Composition, a: f64, b: f64) -> f64 {
    let truthy = |x: f64| x != 0.0;
    match gate {
        Composition::And => {
            if truthy(a) && truthy(b) {
                1.0
            } else {
                0.0
            }
        }
        Composition::Or => {
            if truthy(a) || truthy(b) {
                1.0
            } else {
                0.0
            }
        }
        Composition::Xor => {
            if truthy(a) ^ truthy(b) {
                1.0
            } else {
                0.0
            }
        }
        Composition::Sum => a + b,
        Composition::Average => (a + b) / 2.0,
    }
}
