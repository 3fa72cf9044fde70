pub mod gemm;

use crate::backend::GemmBackend;
use crate::error::{MatrixError, Result};
use crate::object::DynMatrix;
use crate::scalar::Scalar;

/// Pure-Rust CPU GEMM backend.
///
/// A straightforward triple loop over each operand's own strides, optimized
/// for exactness of summation order rather than peak performance.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GemmBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn gemm(
        &self,
        alpha: &Scalar,
        a: &DynMatrix,
        b: &DynMatrix,
        beta: &Scalar,
        c: &mut DynMatrix,
    ) -> Result<()> {
        gemm::check_dims(a.dims(), b.dims(), c.dims())?;

        let expected = c.dtype();
        for got in [a.dtype(), b.dtype()] {
            if got != expected {
                return Err(MatrixError::DTypeMismatch { expected, got });
            }
        }

        match (a, b, c) {
            (DynMatrix::F32(a), DynMatrix::F32(b), DynMatrix::F32(c)) => {
                gemm::gemm(alpha.to_element()?, a, b, beta.to_element()?, c)
            }
            (DynMatrix::F64(a), DynMatrix::F64(b), DynMatrix::F64(c)) => {
                gemm::gemm(alpha.to_element()?, a, b, beta.to_element()?, c)
            }
            (DynMatrix::C32(a), DynMatrix::C32(b), DynMatrix::C32(c)) => {
                gemm::gemm(alpha.to_element()?, a, b, beta.to_element()?, c)
            }
            (DynMatrix::C64(a), DynMatrix::C64(b), DynMatrix::C64(c)) => {
                gemm::gemm(alpha.to_element()?, a, b, beta.to_element()?, c)
            }
            _ => Err(MatrixError::DTypeMismatch {
                expected,
                got: a.dtype(),
            }),
        }
    }
}
