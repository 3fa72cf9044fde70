use mx_core::{DType, MatrixError, Result, Scalar};
use num_complex::Complex;

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MxStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorAllocation = 2,
    ErrorInvalidShape = 3,
    ErrorIncompatibleDimensions = 4,
    ErrorDTypeMismatch = 5,
    ErrorPrecondition = 6,
    ErrorInternal = 7,
}

impl From<&MatrixError> for MxStatus {
    fn from(err: &MatrixError) -> Self {
        match err {
            MatrixError::AllocationFailure { .. } => MxStatus::ErrorAllocation,
            MatrixError::InvalidShape(_) | MatrixError::ShapeMismatch { .. } => {
                MxStatus::ErrorInvalidShape
            }
            MatrixError::IncompatibleDimensions { .. } => MxStatus::ErrorIncompatibleDimensions,
            MatrixError::DTypeMismatch { .. } => MxStatus::ErrorDTypeMismatch,
            MatrixError::PreconditionViolation(_) => MxStatus::ErrorPrecondition,
            MatrixError::InvalidConfig { .. } => MxStatus::ErrorInvalidArgument,
        }
    }
}

/// What an [`MxScalar`] carries.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MxScalarKind {
    /// Additive identity of any datatype; `re` and `im` are ignored.
    Zero = 0,
    /// Multiplicative identity of any datatype; `re` and `im` are ignored.
    One = 1,
    /// Real value `re`, for real matrices.
    Real = 2,
    /// Complex value `re + im*i`, for complex matrices.
    Complex = 3,
}

/// Scalar operand passed by value across the boundary.
///
/// Values are carried in double precision and narrowed to the target
/// matrix's precision.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MxScalar {
    pub kind: MxScalarKind,
    pub re: f64,
    pub im: f64,
}

impl MxScalar {
    pub fn zero() -> Self {
        Self {
            kind: MxScalarKind::Zero,
            re: 0.0,
            im: 0.0,
        }
    }

    pub fn one() -> Self {
        Self {
            kind: MxScalarKind::One,
            re: 0.0,
            im: 0.0,
        }
    }

    pub fn real(re: f64) -> Self {
        Self {
            kind: MxScalarKind::Real,
            re,
            im: 0.0,
        }
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Self {
            kind: MxScalarKind::Complex,
            re,
            im,
        }
    }

    /// Resolve against the datatype of the matrix it will be applied to.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` when a real value targets a complex matrix or
    /// the other way round.
    pub fn to_scalar(self, dtype: DType) -> Result<Scalar> {
        let scalar = match (self.kind, dtype) {
            (MxScalarKind::Zero, _) => Scalar::ZERO,
            (MxScalarKind::One, _) => Scalar::ONE,
            (MxScalarKind::Real, DType::F32) => Scalar::F32(self.re as f32),
            (MxScalarKind::Real, DType::F64) => Scalar::F64(self.re),
            (MxScalarKind::Complex, DType::C32) => {
                Scalar::C32(Complex::new(self.re as f32, self.im as f32))
            }
            (MxScalarKind::Complex, DType::C64) => Scalar::C64(Complex::new(self.re, self.im)),
            (MxScalarKind::Real, _) => {
                return Err(MatrixError::DTypeMismatch {
                    expected: dtype,
                    got: DType::F64,
                })
            }
            (MxScalarKind::Complex, _) => {
                return Err(MatrixError::DTypeMismatch {
                    expected: dtype,
                    got: DType::C64,
                })
            }
        };
        Ok(scalar)
    }
}

impl From<Scalar> for MxScalar {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Zero => MxScalar::zero(),
            Scalar::One => MxScalar::one(),
            Scalar::F32(v) => MxScalar::real(v as f64),
            Scalar::F64(v) => MxScalar::real(v),
            Scalar::C32(v) => MxScalar::complex(v.re as f64, v.im as f64),
            Scalar::C64(v) => MxScalar::complex(v.re, v.im),
        }
    }
}
