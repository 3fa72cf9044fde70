use std::fmt::{self, Debug};
use std::ops::{Add, Div, Mul};

use num_complex::Complex;
use num_traits::{One, Zero};
use rand::Rng;

use crate::dtype::DType;
use crate::scalar::Scalar;

/// An element type a [`Matrix`](crate::Matrix) can hold.
///
/// The set is closed: `f32`, `f64`, `Complex<f32>` and `Complex<f64>`, one per
/// [`DType`]. Arithmetic is plain `+` and `*` of the type; complex products
/// follow the usual `(a+bi)(c+di)` rule.
pub trait Element:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Datatype tag of this element type.
    const DTYPE: DType;

    /// Draws a value whose real components are each uniform over `[low, high]`.
    fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> Self;

    /// The value `v` (with zero imaginary part for complex types).
    fn from_real(v: f64) -> Self;

    /// Magnitude of `self - other`, widened to f64.
    fn abs_diff(self, other: Self) -> f64;

    /// Converts a scalar operand, accepting the canonical constants and the
    /// variant of this datatype only.
    fn from_scalar(scalar: Scalar) -> Option<Self>;

    /// Wraps this value in the typed scalar variant of its datatype.
    fn to_scalar(self) -> Scalar;

    /// Writes the value right-aligned in `width` columns with `precision`
    /// fractional digits (the `%w.pf` convention).
    fn write_fixed<W: fmt::Write + ?Sized>(
        &self,
        out: &mut W,
        width: usize,
        precision: usize,
    ) -> fmt::Result;
}

macro_rules! impl_real_element {
    ($ty:ty, $dtype:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$dtype;

            fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> Self {
                rng.gen_range(low..=high) as $ty
            }

            fn from_real(v: f64) -> Self {
                v as $ty
            }

            fn abs_diff(self, other: Self) -> f64 {
                (self - other).abs() as f64
            }

            fn from_scalar(scalar: Scalar) -> Option<Self> {
                match scalar {
                    Scalar::Zero => Some(0.0),
                    Scalar::One => Some(1.0),
                    Scalar::$dtype(v) => Some(v),
                    _ => None,
                }
            }

            fn to_scalar(self) -> Scalar {
                Scalar::$dtype(self)
            }

            fn write_fixed<W: fmt::Write + ?Sized>(
                &self,
                out: &mut W,
                width: usize,
                precision: usize,
            ) -> fmt::Result {
                write!(out, "{:>width$.precision$}", self)
            }
        }
    };
}

macro_rules! impl_complex_element {
    ($real:ty, $dtype:ident) => {
        impl Element for Complex<$real> {
            const DTYPE: DType = DType::$dtype;

            fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> Self {
                let re = rng.gen_range(low..=high) as $real;
                let im = rng.gen_range(low..=high) as $real;
                Complex::new(re, im)
            }

            fn from_real(v: f64) -> Self {
                Complex::new(v as $real, 0.0)
            }

            fn abs_diff(self, other: Self) -> f64 {
                (self - other).norm() as f64
            }

            fn from_scalar(scalar: Scalar) -> Option<Self> {
                match scalar {
                    Scalar::Zero => Some(Complex::zero()),
                    Scalar::One => Some(Complex::one()),
                    Scalar::$dtype(v) => Some(v),
                    _ => None,
                }
            }

            fn to_scalar(self) -> Scalar {
                Scalar::$dtype(self)
            }

            fn write_fixed<W: fmt::Write + ?Sized>(
                &self,
                out: &mut W,
                width: usize,
                precision: usize,
            ) -> fmt::Result {
                write!(
                    out,
                    "{:>width$.precision$} {:>+width$.precision$}i",
                    self.re, self.im
                )
            }
        }
    };
}

impl_real_element!(f32, F32);
impl_real_element!(f64, F64);
impl_complex_element!(f32, C32);
impl_complex_element!(f64, C64);
