use std::sync::{Mutex, OnceLock, PoisonError};

use mx_core::{DynMatrix, MatrixConfig};
use rand::rngs::StdRng;

/// Opaque matrix handle owned by the caller between `mx_obj_create` and
/// `mx_obj_free`.
#[derive(Debug)]
pub struct MxObject {
    pub matrix: DynMatrix,
}

impl MxObject {
    pub fn new(matrix: DynMatrix) -> Self {
        Self { matrix }
    }
}

/// Configuration read from the environment on first use.
///
/// An unparseable environment falls back to the defaults.
pub fn config() -> &'static MatrixConfig {
    static CONFIG: OnceLock<MatrixConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        MatrixConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring matrix configuration from environment");
            MatrixConfig::default()
        })
    })
}

/// Run `f` with the process-wide generator behind `mx_randm`.
///
/// The generator is created once from the configured distribution, so a
/// seeded process replays the same sequence of fills while successive fills
/// still differ.
pub fn with_rng<R>(f: impl FnOnce(&mut StdRng) -> R) -> R {
    static RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();
    let mut rng = RNG
        .get_or_init(|| Mutex::new(config().random.rng()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut rng)
}
