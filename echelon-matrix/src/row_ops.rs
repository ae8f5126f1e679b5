//! Elementary row operations
//!
//! The public functions are pure: they validate indexes, copy the input and
//! return a new matrix. The `*_in` kernels work on a raw row-major buffer and
//! are shared with the reducers, which keep a single scratch buffer alive for
//! the whole elimination.

use echelon_core::{Matrix, MatrixError, Value, EchelonError};
use echelon_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::helpers::{extract_matrix, extract_number, extract_row};

// ============================================================================
// Buffer kernels
// ============================================================================

pub(crate) fn swap_rows_in(buf: &mut [f64], columns: usize, r1: usize, r2: usize) {
    if r1 == r2 {
        return;
    }
    let (lo, hi) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
    let (head, tail) = buf.split_at_mut(hi * columns);
    head[lo * columns..(lo + 1) * columns].swap_with_slice(&mut tail[..columns]);
}

pub(crate) fn scale_row_in(buf: &mut [f64], columns: usize, row: usize, scalar: f64) {
    for x in &mut buf[row * columns..(row + 1) * columns] {
        *x *= scalar;
    }
}

/// `dst += scalar * src`
pub(crate) fn combine_rows_in(buf: &mut [f64], columns: usize, src: usize, scalar: f64, dst: usize) {
    for l in 0..columns {
        buf[dst * columns + l] += buf[src * columns + l] * scalar;
    }
}

fn check_row(m: &Matrix, index: usize) -> Result<(), MatrixError> {
    if index >= m.rows() {
        return Err(MatrixError::InvalidRowIndex { index, rows: m.rows() });
    }
    Ok(())
}

// ============================================================================
// Pure operations
// ============================================================================

/// Exchange rows `r1` and `r2`
pub fn row_swap(r1: usize, r2: usize, m: &Matrix) -> Result<Matrix, MatrixError> {
    check_row(m, r1)?;
    check_row(m, r2)?;
    let mut buf = m.entries().to_vec();
    swap_rows_in(&mut buf, m.columns(), r1, r2);
    Ok(Matrix::from_parts(m.rows(), m.columns(), buf))
}

/// Multiply every entry of `row` by `scalar`
pub fn row_scale(row: usize, scalar: f64, m: &Matrix) -> Result<Matrix, MatrixError> {
    check_row(m, row)?;
    let mut buf = m.entries().to_vec();
    scale_row_in(&mut buf, m.columns(), row, scalar);
    Ok(Matrix::from_parts(m.rows(), m.columns(), buf))
}

/// Replace `dst_row` with `dst_row + scalar * src_row`; `src_row` is left as is
pub fn row_combine(src_row: usize, scalar: f64, dst_row: usize, m: &Matrix) -> Result<Matrix, MatrixError> {
    check_row(m, src_row)?;
    check_row(m, dst_row)?;
    let mut buf = m.entries().to_vec();
    combine_rows_in(&mut buf, m.columns(), src_row, scalar, dst_row);
    Ok(Matrix::from_parts(m.rows(), m.columns(), buf))
}

// ============================================================================
// ROW_SWAP
// ============================================================================

pub struct RowSwapFn;

static ROW_SWAP_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to operate on"),
    ArgMeta::required("r1", "Number", "First row index (from 0)"),
    ArgMeta::required("r2", "Number", "Second row index (from 0)"),
];
static ROW_SWAP_EXAMPLES: [&str; 1] = ["row_swap(matrix(2, 2, 1, 2, 3, 4), 0, 1) → [[3, 4], [1, 2]]"];
static ROW_SWAP_RELATED: [&str; 2] = ["row_scale", "row_combine"];

impl FunctionPlugin for RowSwapFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "row_swap",
            description: "Exchange two rows of a matrix",
            usage: "row_swap(matrix, r1, r2)",
            args: &ROW_SWAP_ARGS,
            returns: "Matrix",
            examples: &ROW_SWAP_EXAMPLES,
            category: "matrix/rows",
            related: &ROW_SWAP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 3 {
            return Value::Error(EchelonError::arg_count("row_swap", 3, args.len()));
        }

        let m = match extract_matrix(&args[0], "row_swap", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let r1 = match extract_row(&args[1], m, "row_swap", "r1") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };
        let r2 = match extract_row(&args[2], m, "row_swap", "r2") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };

        row_swap(r1, r2, m).into()
    }
}

// ============================================================================
// ROW_SCALE
// ============================================================================

pub struct RowScaleFn;

static ROW_SCALE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to operate on"),
    ArgMeta::required("row", "Number", "Row index (from 0)"),
    ArgMeta::required("scalar", "Number", "Factor applied to the row"),
];
static ROW_SCALE_EXAMPLES: [&str; 1] = ["row_scale(matrix(2, 2, 1, 2, 3, 4), 1, 0.5) → [[1, 2], [1.5, 2]]"];
static ROW_SCALE_RELATED: [&str; 2] = ["row_swap", "row_combine"];

impl FunctionPlugin for RowScaleFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "row_scale",
            description: "Multiply one row of a matrix by a scalar",
            usage: "row_scale(matrix, row, scalar)",
            args: &ROW_SCALE_ARGS,
            returns: "Matrix",
            examples: &ROW_SCALE_EXAMPLES,
            category: "matrix/rows",
            related: &ROW_SCALE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 3 {
            return Value::Error(EchelonError::arg_count("row_scale", 3, args.len()));
        }

        let m = match extract_matrix(&args[0], "row_scale", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let row = match extract_row(&args[1], m, "row_scale", "row") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };
        let scalar = match extract_number(&args[2], "row_scale", "scalar") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        row_scale(row, scalar, m).into()
    }
}

// ============================================================================
// ROW_COMBINE
// ============================================================================

pub struct RowCombineFn;

static ROW_COMBINE_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to operate on"),
    ArgMeta::required("src", "Number", "Row added (unchanged in the result)"),
    ArgMeta::required("scalar", "Number", "Factor applied to the source row"),
    ArgMeta::required("dst", "Number", "Row replaced by dst + scalar * src"),
];
static ROW_COMBINE_EXAMPLES: [&str; 1] = ["row_combine(matrix(2, 2, 1, 2, 3, 4), 0, -3, 1) → [[1, 2], [0, -2]]"];
static ROW_COMBINE_RELATED: [&str; 2] = ["row_swap", "row_scale"];

impl FunctionPlugin for RowCombineFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "row_combine",
            description: "Add a multiple of one row into another",
            usage: "row_combine(matrix, src, scalar, dst)",
            args: &ROW_COMBINE_ARGS,
            returns: "Matrix",
            examples: &ROW_COMBINE_EXAMPLES,
            category: "matrix/rows",
            related: &ROW_COMBINE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 4 {
            return Value::Error(EchelonError::arg_count("row_combine", 4, args.len()));
        }

        let m = match extract_matrix(&args[0], "row_combine", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let src = match extract_row(&args[1], m, "row_combine", "src") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };
        let scalar = match extract_number(&args[2], "row_combine", "scalar") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let dst = match extract_row(&args[3], m, "row_combine", "dst") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };

        row_combine(src, scalar, dst, m).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echelon_core::codes;

    fn m(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_slice(rows, cols, data).unwrap()
    }

    #[test]
    fn test_row_swap() {
        let a = m(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let swapped = row_swap(0, 2, &a).unwrap();
        assert_eq!(swapped.entries(), &[5.0, 6.0, 3.0, 4.0, 1.0, 2.0]);
        // input untouched
        assert_eq!(a.entries(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        // order of arguments does not matter
        assert_eq!(row_swap(2, 0, &a).unwrap(), swapped);
    }

    #[test]
    fn test_row_swap_with_itself_is_noop() {
        let a = m(2, 3, &[1.0, -2.0, 3.0, 4.0, 0.5, 6.0]);
        for r in 0..2 {
            assert_eq!(row_swap(r, r, &a).unwrap(), a);
        }
    }

    #[test]
    fn test_row_swap_invalid_index() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            row_swap(0, 2, &a),
            Err(MatrixError::InvalidRowIndex { index: 2, rows: 2 })
        );
        assert!(row_swap(5, 0, &a).is_err());
    }

    #[test]
    fn test_row_scale() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let scaled = row_scale(1, 0.5, &a).unwrap();
        assert_eq!(scaled.entries(), &[1.0, 2.0, 1.5, 2.0]);
        assert_eq!(a.entries(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            row_scale(2, 1.0, &a),
            Err(MatrixError::InvalidRowIndex { index: 2, rows: 2 })
        );
    }

    #[test]
    fn test_row_combine() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let combined = row_combine(0, -4.0, 1, &a).unwrap();
        assert_eq!(combined.entries(), &[1.0, 2.0, 3.0, 0.0, -3.0, -6.0]);
        assert_eq!(a.entries(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(row_combine(0, 1.0, 3, &a).is_err());
        assert!(row_combine(3, 1.0, 0, &a).is_err());
    }

    #[test]
    fn test_row_combine_into_itself() {
        let a = m(1, 2, &[1.0, 2.0]);
        let doubled = row_combine(0, 1.0, 0, &a).unwrap();
        assert_eq!(doubled.entries(), &[2.0, 4.0]);
    }

    #[test]
    fn test_row_swap_fn() {
        let ctx = EvalContext::new();
        let a = Value::Matrix(m(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        let result = RowSwapFn.call(&[a.clone(), 0.0.into(), 1.0.into()], &ctx);
        assert_eq!(result.as_matrix().unwrap().entries(), &[3.0, 4.0, 1.0, 2.0]);

        let err = RowSwapFn.call(&[a.clone(), 0.0.into(), 7.0.into()], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_ROW_INDEX);

        let err = RowSwapFn.call(&[a], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::ARG_COUNT);
    }

    #[test]
    fn test_row_combine_fn() {
        let ctx = EvalContext::new();
        let a = Value::Matrix(m(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        let result = RowCombineFn.call(&[a, 0.0.into(), (-3.0).into(), 1.0.into()], &ctx);
        assert_eq!(result.as_matrix().unwrap().entries(), &[1.0, 2.0, 0.0, -2.0]);
    }
}
