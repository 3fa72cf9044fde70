use num_complex::Complex;

use crate::dtype::DType;
use crate::element::Element;
use crate::error::{MatrixError, Result};

/// A scalar operand (`alpha`, `beta`, or a fill value).
///
/// `Zero` and `One` are the canonical additive and multiplicative identities
/// and convert to any datatype. The typed variants only convert to their own
/// datatype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Zero,
    One,
    F32(f32),
    F64(f64),
    C32(Complex<f32>),
    C64(Complex<f64>),
}

impl Scalar {
    pub const ZERO: Scalar = Scalar::Zero;
    pub const ONE: Scalar = Scalar::One;

    /// Datatype of a typed scalar; `None` for the canonical constants.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            Scalar::Zero | Scalar::One => None,
            Scalar::F32(_) => Some(DType::F32),
            Scalar::F64(_) => Some(DType::F64),
            Scalar::C32(_) => Some(DType::C32),
            Scalar::C64(_) => Some(DType::C64),
        }
    }

    /// Converts to an element of type `T`.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` if this is a typed scalar of another datatype.
    pub fn to_element<T: Element>(&self) -> Result<T> {
        T::from_scalar(*self).ok_or_else(|| MatrixError::DTypeMismatch {
            expected: T::DTYPE,
            got: self.dtype().unwrap_or(T::DTYPE),
        })
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::F32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<Complex<f32>> for Scalar {
    fn from(v: Complex<f32>) -> Self {
        Scalar::C32(v)
    }
}

impl From<Complex<f64>> for Scalar {
    fn from(v: Complex<f64>) -> Self {
        Scalar::C64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_constants_any_dtype() {
        assert_eq!(Scalar::ONE.to_element::<f32>().unwrap(), 1.0);
        assert_eq!(Scalar::ZERO.to_element::<f64>().unwrap(), 0.0);
        assert_eq!(
            Scalar::ONE.to_element::<Complex<f32>>().unwrap(),
            Complex::new(1.0, 0.0)
        );
        assert!(Scalar::ONE.dtype().is_none());
    }

    #[test]
    fn test_typed_scalar() {
        let s = Scalar::from(2.5f64);
        assert_eq!(s.dtype(), Some(DType::F64));
        assert_eq!(s.to_element::<f64>().unwrap(), 2.5);
    }

    #[test]
    fn test_typed_scalar_mismatch() {
        let err = Scalar::from(2.5f64).to_element::<f32>().unwrap_err();
        assert_eq!(
            err,
            MatrixError::DTypeMismatch {
                expected: DType::F32,
                got: DType::F64
            }
        );
    }
}
