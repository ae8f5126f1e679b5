//! Echelon Core - Fundamental types
//!
//! This crate provides the core types used throughout Echelon:
//! - `Matrix`: Dense row-major real matrix (a vector is an n×1 matrix)
//! - `MatrixError`: Typed failures of matrix operations
//! - `PivotRule`: Pivot selection rule shared by the reducers and the context
//! - `Value`: Runtime values (numbers, matrices, text, errors)
//! - `EchelonError`: Structured errors for front-ends

mod matrix;
mod pivot;
mod value;
mod error;

pub use matrix::{Matrix, MatrixError};
pub use pivot::PivotRule;
pub use value::Value;
pub use error::{EchelonError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Matrix, MatrixError, PivotRule, Value, EchelonError, Severity};
    pub use crate::error::codes;
}
