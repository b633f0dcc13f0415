//! This crate provides integer linear algebra over run-length encoded data:
//! - [`crate::rlevec::RleVec`]: a vector of `i64` stored as a list of runs of equal values, with
//!   elementwise arithmetic, slicing, and dot products that work run-by-run
//! - [`crate::rlematrix::RleMatrix`]: a column-major matrix of `RleVec` columns, which implements
//!   structural operations, products, Gauss-Jordan elimination, inversion, LU factorization,
//!   linear solves, determinants, and CSV export
//! - [`crate::dense::DenseMatrix`]: a plain row-major matrix used as a conversion target and as
//!   the fallback for mixed-format products
//!
//! Arithmetic is over `i64` and division truncates toward zero, so elimination-based results are
//! exact only when every division performed is exact. Faults are reported through
//! [`crate::error::MatrixError`].

#![allow(clippy::needless_range_loop)]

pub mod dense;
pub mod elimination;
pub mod error;
pub mod rlematrix;
pub mod rlevec;
pub mod run;

#[cfg(test)]
mod proptests;

pub use dense::{DenseMatrix, COFACTOR_HARD_LIMIT};
pub use elimination::{RowOps, COFACTOR_LIMIT};
pub use error::{MatrixError, Result};
pub use rlematrix::arith::{MatrixRef, Operand, Product};
pub use rlematrix::RleMatrix;
pub use rlevec::{BinOp, RleVec};
pub use run::{Run, RunIter, RunSlice};
