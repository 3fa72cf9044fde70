use std::fmt::Debug;

use crate::error::Result;
use crate::object::DynMatrix;
use crate::scalar::Scalar;

/// Trait for pluggable GEMM backends.
///
/// Operands arrive as datatype-tagged matrices; a backend checks that they
/// agree before touching any data.
pub trait GemmBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// General matrix multiply-accumulate: `C := beta*C + alpha*A*B`.
    ///
    /// - `a`: `m x k`, `b`: `k x n`, `c`: `m x n`, any valid strides
    /// - `alpha`, `beta`: canonical constants or scalars of C's datatype
    ///
    /// # Errors
    /// `IncompatibleDimensions` if the dimension law fails, `DTypeMismatch`
    /// if A, B, C or a typed scalar disagree on datatype. C is unchanged on
    /// error.
    fn gemm(
        &self,
        alpha: &Scalar,
        a: &DynMatrix,
        b: &DynMatrix,
        beta: &Scalar,
        c: &mut DynMatrix,
    ) -> Result<()>;
}
