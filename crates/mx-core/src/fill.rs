use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{MatrixError, Result};

/// Distribution used by random fills.
///
/// Every real component is drawn uniformly from `[low, high]`. With a seed
/// the fill is reproducible; without one the generator is seeded from OS
/// entropy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomFill {
    low: f64,
    high: f64,
    seed: Option<u64>,
}

impl Default for RandomFill {
    fn default() -> Self {
        Self {
            low: -1.0,
            high: 1.0,
            seed: None,
        }
    }
}

impl RandomFill {
    /// Uniform fill over `[low, high]`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` unless both bounds are finite and `low <= high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(MatrixError::InvalidConfig {
                key: "random range".to_string(),
                value: format!("[{}, {}]", low, high),
            });
        }
        Ok(Self {
            low,
            high,
            seed: None,
        })
    }

    /// Fix the generator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// A fresh generator positioned at the start of this distribution's
    /// stream. Reuse one generator across fills to get distinct values.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
