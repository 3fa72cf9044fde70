use crate::error::{MatrixError, Result};
use crate::fill::RandomFill;
use crate::layout::{Order, Strides};
use crate::print::PrintFormat;

/// Process-level defaults for matrix construction, random fills and display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatrixConfig {
    /// Packing order chosen for automatic strides.
    pub auto_order: Order,
    /// Distribution for random fills.
    pub random: RandomFill,
    /// Default number format for display. Callers that pass an explicit
    /// width and precision bypass it.
    pub print: PrintFormat,
}

impl MatrixConfig {
    /// Read configuration from the process environment.
    ///
    /// Reads the following keys, falling back to the defaults when absent:
    /// - `MX_AUTO_ORDER` -> auto_order (`row` or `col`)
    /// - `MX_RANDOM_SEED` -> random.seed
    /// - `MX_PRINT_PRECISION` -> print.precision
    pub fn from_env() -> Result<MatrixConfig> {
        MatrixConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<MatrixConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = MatrixConfig::default();

        if let Some(value) = lookup("MX_AUTO_ORDER") {
            let order = value.trim().to_ascii_lowercase();
            config.auto_order = match order.as_str() {
                "row" | "row-major" => Order::RowMajor,
                "col" | "col-major" | "column" => Order::ColMajor,
                _ => return Err(invalid("MX_AUTO_ORDER", value)),
            };
        }

        if let Some(value) = lookup("MX_RANDOM_SEED") {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid("MX_RANDOM_SEED", value.clone()))?;
            config.random = config.random.with_seed(seed);
        }

        if let Some(value) = lookup("MX_PRINT_PRECISION") {
            let precision = value
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid("MX_PRINT_PRECISION", value.clone()))?;
            config.print = PrintFormat::new(config.print.width, precision);
        }

        tracing::debug!(?config, "loaded matrix config");
        Ok(config)
    }

    /// Stride request for an automatically packed matrix under this config.
    pub fn auto_strides(&self) -> Strides {
        Strides::Packed(self.auto_order)
    }
}

fn invalid(key: &str, value: String) -> MatrixError {
    MatrixError::InvalidConfig {
        key: key.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = MatrixConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, MatrixConfig::default());
        assert_eq!(config.auto_order, Order::ColMajor);
        assert_eq!(config.print, PrintFormat::new(5, 2));
    }

    #[test]
    fn test_reads_keys() {
        let config = MatrixConfig::from_lookup(lookup(&[
            ("MX_AUTO_ORDER", "row"),
            ("MX_RANDOM_SEED", "1234"),
            ("MX_PRINT_PRECISION", "4"),
        ]))
        .unwrap();
        assert_eq!(config.auto_order, Order::RowMajor);
        assert_eq!(config.random.seed(), Some(1234));
        assert_eq!(config.print.precision, 4);
        assert_eq!(config.auto_strides(), Strides::Packed(Order::RowMajor));
    }

    #[test]
    fn test_invalid_values() {
        let err = MatrixConfig::from_lookup(lookup(&[("MX_AUTO_ORDER", "diagonal")])).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidConfig { ref key, .. } if key == "MX_AUTO_ORDER"));
        assert!(MatrixConfig::from_lookup(lookup(&[("MX_RANDOM_SEED", "-1")])).is_err());
    }
}
