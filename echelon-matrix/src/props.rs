//! Matrix property functions

use echelon_core::{Matrix, PivotRule, Value, EchelonError};
use echelon_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::echelon::row_echelon_with;
use crate::helpers::{check_arg_range, extract_matrix, extract_pivot_rule, extract_usize};

/// Number of nonzero rows in the row-echelon form
pub fn rank(m: &Matrix) -> usize {
    rank_with(m, PivotRule::default())
}

pub fn rank_with(m: &Matrix, rule: PivotRule) -> usize {
    let echelon = row_echelon_with(m, rule);
    (0..echelon.rows())
        .rev()
        .filter(|&r| echelon.row(r).is_some_and(|row| row.iter().any(|&x| x != 0.0)))
        .count()
}

/// `columns - rank`.
///
/// Signed: under the literal pivot rule a free column can leave nonzero rows
/// behind, so rank may exceed the column count and nullity goes negative.
pub fn nullity(m: &Matrix) -> isize {
    nullity_with(m, PivotRule::default())
}

pub fn nullity_with(m: &Matrix, rule: PivotRule) -> isize {
    m.columns() as isize - rank_with(m, rule) as isize
}

// ============================================================================
// ROWS / COLS - dimensions
// ============================================================================

pub struct RowsFn;

static ROWS_ARGS: [ArgMeta; 1] = [ArgMeta::required("matrix", "Matrix", "Matrix to query")];
static ROWS_EXAMPLES: [&str; 1] = ["rows(matrix(3, 2, 1, 2, 3, 4, 5, 6)) → 3"];
static ROWS_RELATED: [&str; 1] = ["cols"];

impl FunctionPlugin for RowsFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "rows",
            description: "Get the number of rows in a matrix",
            usage: "rows(matrix)",
            args: &ROWS_ARGS,
            returns: "Number",
            examples: &ROWS_EXAMPLES,
            category: "matrix/props",
            related: &ROWS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 1 {
            return Value::Error(EchelonError::arg_count("rows", 1, args.len()));
        }

        let matrix = match extract_matrix(&args[0], "rows", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        Value::from(matrix.rows())
    }
}

pub struct ColsFn;

static COLS_EXAMPLES: [&str; 1] = ["cols(matrix(3, 2, 1, 2, 3, 4, 5, 6)) → 2"];
static COLS_RELATED: [&str; 1] = ["rows"];

impl FunctionPlugin for ColsFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "cols",
            description: "Get the number of columns in a matrix",
            usage: "cols(matrix)",
            args: &ROWS_ARGS,
            returns: "Number",
            examples: &COLS_EXAMPLES,
            category: "matrix/props",
            related: &COLS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 1 {
            return Value::Error(EchelonError::arg_count("cols", 1, args.len()));
        }

        let matrix = match extract_matrix(&args[0], "cols", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        Value::from(matrix.columns())
    }
}

// ============================================================================
// GET - Single entry
// ============================================================================

pub struct GetFn;

static GET_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to read"),
    ArgMeta::required("row", "Number", "Row index (from 0)"),
    ArgMeta::required("col", "Number", "Column index (from 0)"),
];
static GET_EXAMPLES: [&str; 1] = ["get(matrix(2, 2, 1, 2, 3, 4), 1, 0) → 3"];
static GET_RELATED: [&str; 2] = ["rows", "cols"];

impl FunctionPlugin for GetFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "get",
            description: "Read one entry of a matrix",
            usage: "get(matrix, row, col)",
            args: &GET_ARGS,
            returns: "Number",
            examples: &GET_EXAMPLES,
            category: "matrix/props",
            related: &GET_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 3 {
            return Value::Error(EchelonError::arg_count("get", 3, args.len()));
        }

        let matrix = match extract_matrix(&args[0], "get", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let row = match extract_usize(&args[1], "get", "row") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };
        let col = match extract_usize(&args[2], "get", "col") {
            Ok(c) => c,
            Err(e) => return Value::Error(e),
        };

        match matrix.get(row, col) {
            Some(x) => Value::Number(x),
            None => Value::Error(EchelonError::domain_error(format!(
                "get: ({}, {}) is outside a {}×{} matrix",
                row, col, matrix.rows(), matrix.columns()
            ))),
        }
    }
}

// ============================================================================
// RANK / NULLITY
// ============================================================================

pub struct RankFn;

static RANK_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("matrix", "Matrix", "Matrix to analyze"),
    ArgMeta::optional("pivot", "Text", "Pivot rule: 'largest' or 'magnitude'", "context setting"),
];
static RANK_EXAMPLES: [&str; 2] = [
    "rank(identity(3)) → 3",
    "rank(matrix(2, 3, 1, 2, 3, 2, 4, 6)) → 1",
];
static RANK_RELATED: [&str; 2] = ["nullity", "ref"];

impl FunctionPlugin for RankFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "rank",
            description: "Number of pivot rows in the row-echelon form",
            usage: "rank(matrix, [pivot])",
            args: &RANK_ARGS,
            returns: "Number",
            examples: &RANK_EXAMPLES,
            category: "matrix/props",
            related: &RANK_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_range("rank", args, 1, 2) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "rank", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let rule = match extract_pivot_rule(args.get(1), ctx, "rank") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };

        Value::from(rank_with(matrix, rule))
    }
}

pub struct NullityFn;

static NULLITY_EXAMPLES: [&str; 2] = [
    "nullity(identity(3)) → 0",
    "nullity(matrix(2, 3, 1, 2, 3, 2, 4, 6)) → 2",
];
static NULLITY_RELATED: [&str; 2] = ["rank", "rref"];

impl FunctionPlugin for NullityFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "nullity",
            description: "Dimension of the null space: columns minus rank",
            usage: "nullity(matrix, [pivot])",
            args: &RANK_ARGS,
            returns: "Number",
            examples: &NULLITY_EXAMPLES,
            category: "matrix/props",
            related: &NULLITY_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = check_arg_range("nullity", args, 1, 2) {
            return Value::Error(e);
        }

        let matrix = match extract_matrix(&args[0], "nullity", "matrix") {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };
        let rule = match extract_pivot_rule(args.get(1), ctx, "nullity") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };

        Value::Number(nullity_with(matrix, rule) as f64)
    }
}
