use std::fmt;

/// Numeric representation of matrix elements.
///
/// Every operand of one GEMM call must carry the same `DType`; there is no
/// mixed-precision arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Real single precision.
    F32,
    /// Real double precision.
    F64,
    /// Complex single precision (`num_complex::Complex<f32>`).
    C32,
    /// Complex double precision (`num_complex::Complex<f64>`).
    C64,
}

impl DType {
    /// Size in bytes of one element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 | DType::C32 => 8,
            DType::C64 => 16,
        }
    }

    /// Converts a numeric datatype code to a `DType`.
    ///
    /// Codes:
    /// - bit 0 set => complex
    /// - bit 1 set => double precision
    ///
    /// giving 0 => F32, 1 => C32, 2 => F64, 3 => C64.
    pub fn from_code(code: u32) -> Option<DType> {
        match code {
            0 => Some(DType::F32),
            1 => Some(DType::C32),
            2 => Some(DType::F64),
            3 => Some(DType::C64),
            _ => None,
        }
    }

    /// Returns the numeric code for this `DType`.
    pub fn code(&self) -> u32 {
        match self {
            DType::F32 => 0,
            DType::C32 => 1,
            DType::F64 => 2,
            DType::C64 => 3,
        }
    }

    /// Returns true for complex datatypes.
    pub fn is_complex(&self) -> bool {
        matches!(self, DType::C32 | DType::C64)
    }

    /// Returns true for double-precision datatypes.
    pub fn is_double(&self) -> bool {
        matches!(self, DType::F64 | DType::C64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
            DType::C32 => write!(f, "c32"),
            DType::C64 => write!(f, "c64"),
        }
    }
}
