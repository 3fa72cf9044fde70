use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// How the existing contents of C enter the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BetaCase {
    /// C is overwritten and never read.
    Zero,
    /// C is added unscaled.
    One,
    General,
}

impl BetaCase {
    fn of<T: Element>(beta: T) -> Self {
        if beta.is_zero() {
            BetaCase::Zero
        } else if beta.is_one() {
            BetaCase::One
        } else {
            BetaCase::General
        }
    }
}

/// Check the GEMM dimension law for `(rows, cols)` pairs:
/// `a.rows == c.rows`, `b.cols == c.cols`, `a.cols == b.rows`.
pub fn check_dims(a: (usize, usize), b: (usize, usize), c: (usize, usize)) -> Result<()> {
    if a.0 != c.0 || b.1 != c.1 || a.1 != b.0 {
        return Err(MatrixError::IncompatibleDimensions { a, b, c });
    }
    Ok(())
}

/// General matrix multiply-accumulate: `C := beta*C + alpha*A*B`.
///
/// A, B and C may each use any valid layout; the result does not depend on
/// them. For every element of C the products are summed left to right over
/// the inner dimension, so equal inputs give bit-identical outputs whatever
/// the strides.
///
/// Special cases:
/// - C empty: nothing is read or written.
/// - `alpha == 0` or an inner dimension of 0: A and B are never read and
///   C is only scaled by `beta`.
/// - `beta == 0`: C is overwritten without being read, so NaN or Inf
///   already in C does not propagate.
/// - `beta == 1`: the product is added to C unscaled.
/// - `alpha == 1`: the product is not multiplied by alpha.
///
/// # Errors
/// Returns `IncompatibleDimensions` before anything is written if the
/// operand dimensions do not satisfy the dimension law.
pub fn gemm<T: Element>(
    alpha: T,
    a: &Matrix<'_, T>,
    b: &Matrix<'_, T>,
    beta: T,
    c: &mut Matrix<'_, T>,
) -> Result<()> {
    check_dims(a.dims(), b.dims(), c.dims())?;

    let (m, n) = c.dims();
    let k = a.cols();
    let dtype = T::DTYPE;

    if m == 0 || n == 0 {
        tracing::debug!(m, n, k, %dtype, path = "empty", "gemm");
        return Ok(());
    }

    if alpha.is_zero() || k == 0 {
        tracing::debug!(m, n, k, %dtype, path = "scale_only", "gemm");
        scale(beta, c);
        return Ok(());
    }

    let beta_case = BetaCase::of(beta);
    let alpha_one = alpha.is_one();
    let path = match beta_case {
        BetaCase::Zero => "overwrite",
        BetaCase::One => "accumulate",
        BetaCase::General => "general",
    };
    tracing::debug!(m, n, k, %dtype, path, alpha_one, "gemm");

    let (a_data, a_layout) = (a.as_slice(), a.layout());
    let (b_data, b_layout) = (b.as_slice(), b.layout());
    let c_layout = c.layout();
    let c_data = c.as_mut_slice();

    for (i, j) in c_layout.positions() {
        let mut acc = a_data[a_layout.offset(i, 0)] * b_data[b_layout.offset(0, j)];
        for p in 1..k {
            acc = acc + a_data[a_layout.offset(i, p)] * b_data[b_layout.offset(p, j)];
        }
        if !alpha_one {
            acc = alpha * acc;
        }

        let dst = &mut c_data[c_layout.offset(i, j)];
        *dst = match beta_case {
            BetaCase::Zero => acc,
            BetaCase::One => *dst + acc,
            BetaCase::General => beta * *dst + acc,
        };
    }

    Ok(())
}

/// Scale C in place: `C := beta*C`.
///
/// `beta == 1` leaves C untouched; `beta == 0` writes zeros without reading C.
pub fn scale<T: Element>(beta: T, c: &mut Matrix<'_, T>) {
    match BetaCase::of(beta) {
        BetaCase::One => {}
        BetaCase::Zero => c.fill(T::zero()),
        BetaCase::General => {
            let layout = c.layout();
            let data = c.as_mut_slice();
            for (i, j) in layout.positions() {
                let v = &mut data[layout.offset(i, j)];
                *v = beta * *v;
            }
        }
    }
}
