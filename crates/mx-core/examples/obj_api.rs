//! Drives the object API end to end: build A (4x3, random), B (3x5, ones)
//! and C (4x5, zeros), then compute `C := C + A*B` and print each step.
//!
//! Run with `RUST_LOG=mx_core=debug` to see the GEMM path selection, and
//! `MX_RANDOM_SEED=<n>` for a reproducible A.

use mx_core::{CpuBackend, DType, DynMatrix, GemmBackend, MatrixConfig, Result, Scalar};

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = MatrixConfig::from_env()?;
    let (m, n, k) = (4, 3, 5);
    let dtype = DType::F64;

    let mut a = DynMatrix::create_with_config(dtype, m, n, 0, 0, &config)?;
    let mut b = DynMatrix::create_with_config(dtype, n, k, 0, 0, &config)?;
    let mut c = DynMatrix::create_with_config(dtype, m, k, 0, 0, &config)?;

    let mut rng = config.random.rng();
    a.fill_random_with(&mut rng, &config.random);
    b.fill(&Scalar::ONE)?;
    c.fill(&Scalar::ZERO)?;

    print!("{}", a.format("a:", config.print));
    print!("{}", b.format("b:", config.print));
    print!("{}", c.format("c:", config.print));

    let backend = CpuBackend::new();
    backend.gemm(&Scalar::ONE, &a, &b, &Scalar::ONE, &mut c)?;
    tracing::info!(backend = backend.name(), "gemm complete");

    print!("{}", c.format("c := c + a * b:", config.print));

    a.release();
    b.release();
    c.release();
    Ok(())
}
