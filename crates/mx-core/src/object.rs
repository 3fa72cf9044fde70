use std::fmt;

use num_complex::Complex;
use rand::Rng;

use crate::config::MatrixConfig;
use crate::dtype::DType;
use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::fill::RandomFill;
use crate::layout::{Layout, Strides};
use crate::matrix::Matrix;
use crate::print::PrintFormat;
use crate::scalar::Scalar;

/// An owned matrix whose datatype is chosen at runtime.
///
/// This is the object behind an opaque handle: one variant per [`DType`],
/// each wrapping a typed [`Matrix`].
#[derive(Debug)]
pub enum DynMatrix {
    F32(Matrix<'static, f32>),
    F64(Matrix<'static, f64>),
    C32(Matrix<'static, Complex<f32>>),
    C64(Matrix<'static, Complex<f64>>),
}

/// Run `$body` with `$m` bound to the typed matrix inside any variant.
macro_rules! dispatch {
    ($value:expr, $m:ident => $body:expr) => {
        match $value {
            DynMatrix::F32($m) => $body,
            DynMatrix::F64($m) => $body,
            DynMatrix::C32($m) => $body,
            DynMatrix::C64($m) => $body,
        }
    };
}

impl DynMatrix {
    /// Construct from raw handle arguments.
    ///
    /// `row_stride == col_stride == 0` requests automatic strides.
    ///
    /// # Errors
    /// `InvalidShape` for negative dimensions or strides, a single zero
    /// stride, or strides that alias; `AllocationFailure` if storage cannot
    /// be obtained.
    pub fn create(dtype: DType, rows: i64, cols: i64, row_stride: i64, col_stride: i64) -> Result<Self> {
        DynMatrix::create_with_config(dtype, rows, cols, row_stride, col_stride, &MatrixConfig::default())
    }

    /// Like [`DynMatrix::create`], resolving automatic strides through `config`.
    pub fn create_with_config(
        dtype: DType,
        rows: i64,
        cols: i64,
        row_stride: i64,
        col_stride: i64,
        config: &MatrixConfig,
    ) -> Result<Self> {
        let rows = dim(rows, "rows")?;
        let cols = dim(cols, "cols")?;
        let strides = match (row_stride, col_stride) {
            (0, 0) => config.auto_strides(),
            (0, _) | (_, 0) => {
                return Err(MatrixError::InvalidShape(format!(
                    "strides rs={} cs={}: both must be zero or both non-zero",
                    row_stride, col_stride
                )))
            }
            (rs, cs) => Strides::Explicit {
                row: stride(rs)?,
                col: stride(cs)?,
            },
        };
        DynMatrix::new(dtype, rows, cols, strides)
    }

    /// Allocate a matrix of the given datatype.
    pub fn new(dtype: DType, rows: usize, cols: usize, strides: Strides) -> Result<Self> {
        Ok(match dtype {
            DType::F32 => DynMatrix::F32(Matrix::new(rows, cols, strides)?),
            DType::F64 => DynMatrix::F64(Matrix::new(rows, cols, strides)?),
            DType::C32 => DynMatrix::C32(Matrix::new(rows, cols, strides)?),
            DType::C64 => DynMatrix::C64(Matrix::new(rows, cols, strides)?),
        })
    }

    pub fn dtype(&self) -> DType {
        dispatch!(self, m => m.dtype())
    }

    pub fn layout(&self) -> Layout {
        dispatch!(self, m => m.layout())
    }

    pub fn rows(&self) -> usize {
        self.layout().rows()
    }

    pub fn cols(&self) -> usize {
        self.layout().cols()
    }

    /// `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn is_empty(&self) -> bool {
        self.layout().is_empty()
    }

    /// Overwrite every element with `value`.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` for a typed scalar of another datatype.
    pub fn fill(&mut self, value: &Scalar) -> Result<()> {
        dispatch!(self, m => {
            m.fill(value.to_element()?);
            Ok(())
        })
    }

    /// Overwrite every element with a uniform draw from `[-1, 1]`.
    pub fn fill_random(&mut self) {
        let dist = RandomFill::default();
        self.fill_random_with(&mut dist.rng(), &dist);
    }

    /// Overwrite every element with a draw from `dist` using `rng`.
    ///
    /// Successive fills from one generator continue its stream; only a
    /// fresh `dist.rng()` restarts a seeded sequence.
    pub fn fill_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R, dist: &RandomFill) {
        dispatch!(self, m => m.fill_random_with(&mut *rng, dist))
    }

    /// Element at `(i, j)` as a typed scalar, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<Scalar> {
        dispatch!(self, m => m.get(i, j).map(Element::to_scalar))
    }

    /// Overwrite the element at `(i, j)`.
    ///
    /// # Errors
    /// `PreconditionViolation` when out of bounds, `DTypeMismatch` for a
    /// typed scalar of another datatype.
    pub fn set(&mut self, i: usize, j: usize, value: &Scalar) -> Result<()> {
        dispatch!(self, m => m.set(i, j, value.to_element()?))
    }

    /// See [`Matrix::format`].
    pub fn format(&self, label: &str, format: PrintFormat) -> String {
        dispatch!(self, m => m.format(label, format))
    }

    /// Release the matrix and its storage.
    pub fn release(self) {
        dispatch!(self, m => m.release())
    }
}

impl fmt::Display for DynMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, m => fmt::Display::fmt(m, f))
    }
}

macro_rules! impl_from_matrix {
    ($ty:ty, $variant:ident) => {
        impl From<Matrix<'static, $ty>> for DynMatrix {
            fn from(m: Matrix<'static, $ty>) -> Self {
                DynMatrix::$variant(m)
            }
        }
    };
}

impl_from_matrix!(f32, F32);
impl_from_matrix!(f64, F64);
impl_from_matrix!(Complex<f32>, C32);
impl_from_matrix!(Complex<f64>, C64);

fn dim(value: i64, name: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| MatrixError::InvalidShape(format!("{} must be non-negative, got {}", name, value)))
}

fn stride(value: i64) -> Result<isize> {
    match isize::try_from(value) {
        Ok(s) if s > 0 => Ok(s),
        _ => Err(MatrixError::InvalidShape(format!(
            "stride must be positive, got {}",
            value
        ))),
    }
}
