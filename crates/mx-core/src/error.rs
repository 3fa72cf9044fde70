use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("allocation failure: cannot obtain storage for {elements} {dtype} elements")]
    AllocationFailure { dtype: DType, elements: usize },
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("incompatible dimensions: a{a:?} x b{b:?} -> c{c:?}")]
    IncompatibleDimensions {
        a: (usize, usize),
        b: (usize, usize),
        c: (usize, usize),
    },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("precondition violation: {0}")]
    PreconditionViolation(String),
    #[error("invalid config value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
