//! `mx-core` - Dense matrix objects and general matrix multiply-accumulate.
//!
//! This crate provides:
//! - A `Matrix` type generic over its element, with arbitrary row/column strides
//! - `DynMatrix`, a datatype-tagged matrix for opaque-handle APIs
//! - The `gemm` kernel computing `C := beta*C + alpha*A*B`
//! - A `GemmBackend` trait and the reference `CpuBackend`
//! - Element-wise maps, reductions and concatenation
//! - Random and constant fills, formatted display and environment config

pub mod backend;
pub mod config;
pub mod cpu;
pub mod dtype;
pub mod element;
pub mod error;
pub mod fill;
pub mod layout;
pub mod matrix;
pub mod object;
pub mod ops;
pub mod print;
pub mod scalar;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use backend::GemmBackend;
pub use config::MatrixConfig;
pub use cpu::gemm::{gemm, scale};
pub use cpu::CpuBackend;
pub use dtype::DType;
pub use element::Element;
pub use error::{MatrixError, Result};
pub use fill::RandomFill;
pub use layout::{Layout, Order, Strides};
pub use matrix::Matrix;
pub use object::DynMatrix;
pub use print::PrintFormat;
pub use scalar::Scalar;
pub use storage::Storage;
