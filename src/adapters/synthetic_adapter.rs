//! Seeded random-walk data adapter.
//!
//! Serves deterministic close prices for any symbol: a geometric random walk
//! seeded from a base seed folded with the symbol name, so distinct symbols
//! get distinct but reproducible series and repeated calls are identical.

use crate::domain::error::RegimixError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_START_PRICE: f64 = 100.0;
pub const DEFAULT_DAILY_VOL: f64 = 0.02;

pub struct SyntheticDataAdapter {
    seed: u64,
    start_price: f64,
    daily_vol: f64,
}

impl SyntheticDataAdapter {
    pub fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start_price: DEFAULT_START_PRICE,
            daily_vol: DEFAULT_DAILY_VOL,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self {
            seed: config.get_int("data", "seed", DEFAULT_SEED as i64) as u64,
            start_price: config.get_double("data", "start_price", DEFAULT_START_PRICE),
            daily_vol: config.get_double("data", "daily_vol", DEFAULT_DAILY_VOL),
        }
    }

    /// FNV-1a over the symbol, folded into the base seed.
    fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in symbol.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        self.seed ^ hash
    }
}

impl Default for SyntheticDataAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for SyntheticDataAdapter {
    fn load(&self, symbol: &str, _timeframe: &str, limit: usize) -> Result<Vec<f64>, RegimixError> {
        let normal = Normal::new(0.0, self.daily_vol).map_err(|e| {
            RegimixError::DataUnavailable {
                asset: symbol.to_string(),
                reason: format!("invalid volatility {}: {}", self.daily_vol, e),
            }
        })?;

        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut prices = Vec::with_capacity(limit);
        let mut price = self.start_price;
        for _ in 0..limit {
            price *= 1.0 + normal.sample(&mut rng);
            prices.push(price);
        }

        debug!("generated {limit} synthetic samples for {symbol}");
        Ok(prices)
    }
}
