//! Dense row-major matrix of f64
//!
//! A `Matrix` is immutable once built: every algebra operation returns a new
//! value and never touches its inputs. A vector is simply a matrix with one
//! column; operations that need one check at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for matrix operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Invalid shape: {rows}x{columns} matrix cannot hold {len} entries")]
    InvalidShape { rows: usize, columns: usize, len: usize },

    #[error("Invalid row index {index} for matrix with {rows} rows")]
    InvalidRowIndex { index: usize, rows: usize },

    #[error("{op}: dimension mismatch {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Not a vector: {rows}x{columns} matrix must have exactly 1 column")]
    NotAVector { rows: usize, columns: usize },

    #[error("Wrong dimension: expected {expected} rows, got {got}")]
    WrongDimension { expected: usize, got: usize },

    #[error("{op}: zero vector has no direction")]
    ZeroVector { op: &'static str },
}

/// Dense real matrix stored row-major
///
/// Invariants: `rows >= 1`, `columns >= 1`, `entries.len() == rows * columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    columns: usize,
    entries: Vec<f64>,
}

/// Unchecked wire form, validated on the way in
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    columns: usize,
    entries: Vec<f64>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        Matrix::new(raw.rows, raw.columns, raw.entries)
    }
}

/// `rows * columns` for a non-empty shape; zero or overflowing shapes are rejected
fn checked_len(rows: usize, columns: usize, len: usize) -> Result<usize, MatrixError> {
    match rows.checked_mul(columns) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(MatrixError::InvalidShape { rows, columns, len }),
    }
}

/// Zero-filled buffer for a `rows x columns` matrix, failing instead of aborting
/// when the allocation cannot be made
fn zeroed(rows: usize, columns: usize) -> Result<Vec<f64>, MatrixError> {
    let n = checked_len(rows, columns, 0)?;
    let mut entries = Vec::new();
    entries
        .try_reserve_exact(n)
        .map_err(|_| MatrixError::InvalidShape { rows, columns, len: 0 })?;
    entries.resize(n, 0.0);
    Ok(entries)
}

impl Matrix {
    // ========== Construction ==========

    /// Build a matrix from a flat row-major buffer, taking ownership of it
    pub fn new(rows: usize, columns: usize, entries: Vec<f64>) -> Result<Self, MatrixError> {
        let len = entries.len();
        match checked_len(rows, columns, len)? {
            expected if expected == len => Ok(Self { rows, columns, entries }),
            _ => Err(MatrixError::InvalidShape { rows, columns, len }),
        }
    }

    /// Build a matrix by copying a flat row-major slice
    pub fn from_slice(rows: usize, columns: usize, data: &[f64]) -> Result<Self, MatrixError> {
        Self::new(rows, columns, data.to_vec())
    }

    /// Build a matrix from a list of rows; all rows must share one length
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let rows = data.len();
        let columns = data.first().map_or(0, |r| r.len());
        let mut entries = Vec::new();
        for row in data {
            if row.len() != columns {
                return Err(MatrixError::InvalidShape {
                    rows,
                    columns,
                    len: entries.len() + row.len(),
                });
            }
            entries.extend(row);
        }
        Self::new(rows, columns, entries)
    }

    /// n×1 column vector
    pub fn column_vector(values: Vec<f64>) -> Result<Self, MatrixError> {
        let rows = values.len();
        Self::new(rows, 1, values)
    }

    pub fn zeros(rows: usize, columns: usize) -> Result<Self, MatrixError> {
        let entries = zeroed(rows, columns)?;
        Ok(Self { rows, columns, entries })
    }

    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let mut entries = zeroed(n, n)?;
        for i in 0..n {
            entries[i * n + i] = 1.0;
        }
        Ok(Self { rows: n, columns: n, entries })
    }

    /// Wrap a buffer whose shape the caller has already established.
    ///
    /// For algorithms that fill a scratch buffer sized from a valid input.
    ///
    /// # Panics
    ///
    /// Panics if the shape invariants do not hold; that is a bug in the caller.
    #[doc(hidden)]
    pub fn from_parts(rows: usize, columns: usize, entries: Vec<f64>) -> Self {
        assert!(
            rows > 0 && columns > 0 && rows.checked_mul(columns) == Some(entries.len()),
            "from_parts: {}x{} with {} entries",
            rows,
            columns,
            entries.len()
        );
        Self { rows, columns, entries }
    }

    // ========== Access ==========

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Entry at (row, col), or None when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.columns {
            Some(self.entries[row * self.columns + col])
        } else {
            None
        }
    }

    /// Entry at a flat row-major index
    pub fn get_flat(&self, index: usize) -> Option<f64> {
        self.entries.get(index).copied()
    }

    /// Borrow one row as a slice
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.entries[start..start + self.columns])
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.entries.chunks_exact(self.columns)
    }

    /// The whole row-major buffer
    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    /// Consume the matrix, returning its row-major buffer
    pub fn into_entries(self) -> Vec<f64> {
        self.entries
    }

    pub fn is_vector(&self) -> bool {
        self.columns == 1
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Same shape and every entry within `tol` of the other's
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.shape() == other.shape()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| (a - b).abs() <= tol)
    }

    /// Convert to nested rows
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }
}

impl fmt::Display for Matrix {
    /// Rows top to bottom, entries tab-separated. `{:#}` adds a
    /// `Matrix (R x C):` header line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Matrix ({} x {}):", self.rows, self.columns)?;
        }
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, val) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{}", val)?;
            }
        }
        Ok(())
    }
}
