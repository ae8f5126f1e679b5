//! Row-echelon and reduced row-echelon forms
//!
//! Forward elimination with partial pivoting confined to rows at or below the
//! current pivot row, followed (for RREF) by back substitution from the last
//! row up. Both reducers copy the input once into a scratch buffer, mutate
//! that buffer in place, and hand it back as a new `Matrix`.
//!
//! Zero tests are exact (`== 0.0`, `!= 1.0`). On ill-conditioned input the
//! rounding residue left by elimination is treated as a real entry.

use echelon_core::{Matrix, PivotRule, Value};
use echelon_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use tracing::{debug, trace};
use crate::helpers::{check_arg_range, extract_matrix, extract_pivot_rule};
use crate::row_ops::{combine_rows_in, scale_row_in, swap_rows_in};

// ============================================================================
// Pivot search
// ============================================================================

fn argmax_in(buf: &[f64], rows: usize, columns: usize, col: usize, start_row: usize, rule: PivotRule) -> usize {
    let mut best_row = start_row;
    let mut best = rule.key(buf[start_row * columns + col]);
    for i in (start_row + 1)..rows {
        let key = rule.key(buf[i * columns + col]);
        // strict: ties keep the earliest row
        if key > best {
            best = key;
            best_row = i;
        }
    }
    best_row
}

/// Row in `[start_row, rows)` holding the largest raw value of column `col`.
///
/// Ties resolve to the lowest row.
///
/// # Panics
///
/// Panics if `col` or `start_row` is out of range.
pub fn argmax_in_column(m: &Matrix, col: usize, start_row: usize) -> usize {
    argmax_in_column_with(m, col, start_row, PivotRule::Largest)
}

/// Like [`argmax_in_column`], comparing keys chosen by `rule`.
pub fn argmax_in_column_with(m: &Matrix, col: usize, start_row: usize, rule: PivotRule) -> usize {
    assert!(col < m.columns(), "argmax_in_column: column {} out of range", col);
    assert!(start_row < m.rows(), "argmax_in_column: start row {} out of range", start_row);
    argmax_in(m.entries(), m.rows(), m.columns(), col, start_row, rule)
}

// ============================================================================
// Reducers
// ============================================================================

/// Row-echelon form using the default (literal) pivot rule
pub fn row_echelon(m: &Matrix) -> Matrix {
    row_echelon_with(m, PivotRule::default())
}

/// Row-echelon form
pub fn row_echelon_with(m: &Matrix, rule: PivotRule) -> Matrix {
    let (rows, columns) = m.shape();
    debug!(rows, columns, rule = rule.name(), "row echelon");
    let mut buf = m.entries().to_vec();

    let (mut i, mut j) = (0, 0);
    while i < rows && j < columns {
        let candidate = argmax_in(&buf, rows, columns, j, i, rule);
        let pivot = buf[candidate * columns + j];
        if pivot == 0.0 {
            trace!(row = i, column = j, "no pivot, free column");
            j += 1;
            continue;
        }

        trace!(row = i, column = j, from = candidate, pivot, "pivot");
        swap_rows_in(&mut buf, columns, i, candidate);
        for k in (i + 1)..rows {
            let ratio = buf[k * columns + j] / pivot;
            buf[k * columns + j] = 0.0;
            for l in (j + 1)..columns {
                buf[k * columns + l] -= buf[i * columns + l] * ratio;
            }
        }
        i += 1;
        j += 1;
    }

    debug!(pivots = i, "row echelon done");
    Matrix::from_parts(rows, columns, buf)
}

/// Reduced row-echelon form using the default (literal) pivot rule
pub fn reduced_row_echelon(m: &Matrix) -> Matrix {
    reduced_row_echelon_with(m, PivotRule::default())
}

/// Reduced row-echelon form: leading 1s, zeros elsewhere in pivot columns
pub fn reduced_row_echelon_with(m: &Matrix, rule: PivotRule) -> Matrix {
    let (rows, columns) = m.shape();
    let mut buf = row_echelon_with(m, rule).into_entries();

    for row in (0..rows).rev() {
        let Some(col) = (0..columns).find(|&c| buf[row * columns + c] != 0.0) else {
            continue;
        };

        let entry = buf[row * columns + col];
        if entry != 1.0 {
            scale_row_in(&mut buf, columns, row, 1.0 / entry);
        }
        for above in 0..row {
            let factor = -buf[above * columns + col];
            combine_rows_in(&mut buf, columns, row, factor, above);
            buf[above * columns + col] = 0.0;
        }
    }

    debug!(rows, columns, "reduced row echelon done");
    Matrix::from_parts(rows, columns, buf)
}

// ============================================================================
// REF
// ============================================================================

pub struct RefFn;

static REF_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to reduce"),
    ArgMeta::optional("pivot", "Text", "Pivot rule: 'largest' or 'magnitude'", "context setting"),
];
static REF_EXAMPLES: [&str; 2] = [
    "ref(matrix(2, 2, 0, 1, 1, 1)) → [[1, 1], [0, 1]]",
    "ref(matrix(2, 2, 1, 2, -4, 1), \"magnitude\")",
];
static REF_RELATED: [&str; 2] = ["rref", "rank"];

impl FunctionPlugin for RefFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ref",
            description: "Row-echelon form by partial pivoting and forward elimination",
            usage: "ref(matrix, [pivot])",
            args: &REF_ARGS,
            returns: "Matrix",
            examples: &REF_EXAMPLES,
            category: "matrix/reduce",
            related: &REF_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_range("ref", args, 1, 2) {
            return Value::Error(e);
        }

        let m = match extract_matrix(&args[0], "ref", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let rule = match extract_pivot_rule(args.get(1), ctx, "ref") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };

        Value::Matrix(row_echelon_with(m, rule))
    }
}

// ============================================================================
// RREF
// ============================================================================

pub struct RrefFn;

static RREF_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to reduce"),
    ArgMeta::optional("pivot", "Text", "Pivot rule: 'largest' or 'magnitude'", "context setting"),
];
static RREF_EXAMPLES: [&str; 1] = ["rref(matrix(2, 3, 1, 2, 3, 4, 5, 6)) → [[1, 0, -1], [0, 1, 2]]"];
static RREF_RELATED: [&str; 2] = ["ref", "rank"];

impl FunctionPlugin for RrefFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "rref",
            description: "Reduced row-echelon form (leading 1s, back substitution)",
            usage: "rref(matrix, [pivot])",
            args: &RREF_ARGS,
            returns: "Matrix",
            examples: &RREF_EXAMPLES,
            category: "matrix/reduce",
            related: &RREF_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_range("rref", args, 1, 2) {
            return Value::Error(e);
        }

        let m = match extract_matrix(&args[0], "rref", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let rule = match extract_pivot_rule(args.get(1), ctx, "rref") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };

        Value::Matrix(reduced_row_echelon_with(m, rule))
    }
}
