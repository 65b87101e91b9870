//! Price data access port trait.

use crate::domain::error::RegimixError;

pub trait DataPort {
    /// Load the trailing `limit` close prices for `symbol`.
    ///
    /// Implementations must return exactly `limit` samples or fail; the
    /// engine never truncates or pads.
    fn load(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<f64>, RegimixError>;
}
