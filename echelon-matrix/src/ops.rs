//! Elementwise arithmetic and matrix multiplication

use echelon_core::{Matrix, MatrixError, Value, EchelonError};
use echelon_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::helpers::{extract_matrix, extract_number};

/// Which elementwise operation `add_sub` performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSub {
    Add,
    Subtract,
}

/// Elementwise `a + b` or `a - b`; shapes must match
pub fn add_sub(a: &Matrix, b: &Matrix, mode: AddSub) -> Result<Matrix, MatrixError> {
    if a.shape() != b.shape() {
        let op = match mode {
            AddSub::Add => "add",
            AddSub::Subtract => "sub",
        };
        return Err(MatrixError::DimensionMismatch { op, left: a.shape(), right: b.shape() });
    }
    let pairs = a.entries().iter().zip(b.entries());
    let entries: Vec<f64> = match mode {
        AddSub::Add => pairs.map(|(x, y)| x + y).collect(),
        AddSub::Subtract => pairs.map(|(x, y)| x - y).collect(),
    };
    Ok(Matrix::from_parts(a.rows(), a.columns(), entries))
}

pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    add_sub(a, b, AddSub::Add)
}

pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    add_sub(a, b, AddSub::Subtract)
}

/// Multiply every entry by `scalar`
pub fn scalar_multiply(scalar: f64, m: &Matrix) -> Matrix {
    let entries = m.entries().iter().map(|x| scalar * x).collect();
    Matrix::from_parts(m.rows(), m.columns(), entries)
}

/// Matrix product `a · b`; requires `columns(a) == rows(b)`
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    if a.columns() != b.rows() {
        return Err(MatrixError::DimensionMismatch { op: "matmul", left: a.shape(), right: b.shape() });
    }
    let (n, inner, p) = (a.rows(), a.columns(), b.columns());
    let (lhs, rhs) = (a.entries(), b.entries());
    let mut entries = vec![0.0; n * p];
    for i in 0..n {
        for j in 0..p {
            let mut sum = 0.0;
            for k in 0..inner {
                sum += lhs[i * inner + k] * rhs[k * p + j];
            }
            entries[i * p + j] = sum;
        }
    }
    Ok(Matrix::from_parts(n, p, entries))
}

// ============ add / sub ============

pub struct MatAddFn;

static BINARY_ARGS: [ArgMeta; 2] = [
    ArgMeta { name: "a", typ: "Matrix", description: "First matrix", optional: false, default: None },
    ArgMeta { name: "b", typ: "Matrix", description: "Second matrix (same shape)", optional: false, default: None },
];

static ADD_EXAMPLES: [&str; 1] = ["add(matrix(1, 2, 1, 2), matrix(1, 2, 3, 4)) → [[4, 6]]"];
static ADD_RELATED: [&str; 2] = ["sub", "scale"];

impl FunctionPlugin for MatAddFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "add", description: "Elementwise sum of two matrices", usage: "add(a, b)",
            args: &BINARY_ARGS, returns: "Matrix", examples: &ADD_EXAMPLES,
            category: "matrix/arithmetic", related: &ADD_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 2 { return Value::Error(EchelonError::arg_count("add", 2, args.len())); }

        let a = match extract_matrix(&args[0], "add", "a") { Ok(m) => m, Err(e) => return Value::Error(e) };
        let b = match extract_matrix(&args[1], "add", "b") { Ok(m) => m, Err(e) => return Value::Error(e) };

        add(a, b).into()
    }
}

pub struct MatSubFn;

static SUB_EXAMPLES: [&str; 1] = ["sub(matrix(1, 2, 1, 2), matrix(1, 2, 3, 4)) → [[-2, -2]]"];
static SUB_RELATED: [&str; 2] = ["add", "scale"];

impl FunctionPlugin for MatSubFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "sub", description: "Elementwise difference a - b", usage: "sub(a, b)",
            args: &BINARY_ARGS, returns: "Matrix", examples: &SUB_EXAMPLES,
            category: "matrix/arithmetic", related: &SUB_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 2 { return Value::Error(EchelonError::arg_count("sub", 2, args.len())); }

        let a = match extract_matrix(&args[0], "sub", "a") { Ok(m) => m, Err(e) => return Value::Error(e) };
        let b = match extract_matrix(&args[1], "sub", "b") { Ok(m) => m, Err(e) => return Value::Error(e) };

        subtract(a, b).into()
    }
}

// ============ scale ============

pub struct ScaleFn;

static SCALE_ARGS: [ArgMeta; 2] = [
    ArgMeta { name: "scalar", typ: "Number", description: "Factor", optional: false, default: None },
    ArgMeta { name: "matrix", typ: "Matrix", description: "Matrix to scale", optional: false, default: None },
];

static SCALE_EXAMPLES: [&str; 1] = ["scale(2, matrix(1, 2, 1, 2)) → [[2, 4]]"];
static SCALE_RELATED: [&str; 2] = ["add", "row_scale"];

impl FunctionPlugin for ScaleFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "scale", description: "Multiply every entry by a scalar", usage: "scale(scalar, matrix)",
            args: &SCALE_ARGS, returns: "Matrix", examples: &SCALE_EXAMPLES,
            category: "matrix/arithmetic", related: &SCALE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 2 { return Value::Error(EchelonError::arg_count("scale", 2, args.len())); }

        let scalar = match extract_number(&args[0], "scale", "scalar") { Ok(s) => s, Err(e) => return Value::Error(e) };
        let m = match extract_matrix(&args[1], "scale", "matrix") { Ok(m) => m, Err(e) => return Value::Error(e) };

        Value::Matrix(scalar_multiply(scalar, m))
    }
}

// ============ matmul ============

pub struct MatmulFn;

static MATMUL_ARGS: [ArgMeta; 2] = [
    ArgMeta { name: "a", typ: "Matrix", description: "Left matrix (n×k)", optional: false, default: None },
    ArgMeta { name: "b", typ: "Matrix", description: "Right matrix (k×p)", optional: false, default: None },
];

static MATMUL_EXAMPLES: [&str; 1] = ["matmul(matrix(2, 2, 1, 2, 3, 4), matrix(2, 2, 5, 6, 7, 8)) → [[19, 22], [43, 50]]"];
static MATMUL_RELATED: [&str; 2] = ["scale", "dot"];

impl FunctionPlugin for MatmulFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "matmul", description: "Matrix product", usage: "matmul(a, b)",
            args: &MATMUL_ARGS, returns: "Matrix", examples: &MATMUL_EXAMPLES,
            category: "matrix/arithmetic", related: &MATMUL_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 2 { return Value::Error(EchelonError::arg_count("matmul", 2, args.len())); }

        let a = match extract_matrix(&args[0], "matmul", "a") { Ok(m) => m, Err(e) => return Value::Error(e) };
        let b = match extract_matrix(&args[1], "matmul", "b") { Ok(m) => m, Err(e) => return Value::Error(e) };

        multiply(a, b).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interop::to_dmatrix;
    use approx::assert_abs_diff_eq;
    use echelon_core::codes;

    fn m(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_slice(rows, cols, data).unwrap()
    }

    #[test]
    fn test_multiply_2x2() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.to_nested(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn test_multiply_rectangular() {
        let a = m(2, 3, &[1.0, 0.0, 2.0, -1.0, 3.0, 1.0]);
        let b = m(3, 1, &[3.0, 2.0, 1.0]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.entries(), &[5.0, 4.0]);
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let a = m(3, 4, &[1.5, -2.0, 0.0, 4.0, 3.0, 1.0, -1.0, 2.0, 0.5, 0.25, 6.0, -3.0]);
        let b = m(4, 2, &[2.0, 1.0, 0.0, -1.0, 3.0, 3.0, -2.0, 0.5]);
        let ours = multiply(&a, &b).unwrap();
        let theirs = to_dmatrix(&a) * to_dmatrix(&b);
        for i in 0..3 {
            for j in 0..2 {
                assert_abs_diff_eq!(ours.get(i, j).unwrap(), theirs[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_multiply_by_identity() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(multiply(&a, &Matrix::identity(3).unwrap()).unwrap(), a);
        assert_eq!(multiply(&Matrix::identity(2).unwrap(), &a).unwrap(), a);
    }

    #[test]
    fn test_multiply_mismatch() {
        let a = m(2, 3, &[0.0; 6]);
        assert_eq!(
            multiply(&a, &a),
            Err(MatrixError::DimensionMismatch { op: "matmul", left: (2, 3), right: (2, 3) })
        );
    }

    #[test]
    fn test_add_sub() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(2, 2, &[0.5, 0.5, -1.0, 10.0]);
        assert_eq!(add(&a, &b).unwrap().entries(), &[1.5, 2.5, 2.0, 14.0]);
        assert_eq!(subtract(&a, &b).unwrap().entries(), &[0.5, 1.5, 4.0, -6.0]);
        assert_eq!(add_sub(&a, &b, AddSub::Add), add(&a, &b));
    }

    #[test]
    fn test_add_sub_mismatch() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            add(&a, &b),
            Err(MatrixError::DimensionMismatch { op: "add", left: (2, 2), right: (4, 1) })
        );
        assert!(matches!(
            subtract(&b, &a),
            Err(MatrixError::DimensionMismatch { op: "sub", .. })
        ));
    }

    #[test]
    fn test_scalar_multiply() {
        let a = m(1, 3, &[1.0, -2.0, 0.5]);
        assert_eq!(scalar_multiply(-2.0, &a).entries(), &[-2.0, 4.0, -1.0]);
        assert_eq!(scalar_multiply(1.0, &a), a);
    }

    #[test]
    fn test_matmul_fn() {
        let ctx = EvalContext::new();
        let a = Value::Matrix(m(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        let b = Value::Matrix(m(2, 2, &[5.0, 6.0, 7.0, 8.0]));
        let c = MatmulFn.call(&[a.clone(), b], &ctx);
        assert_eq!(c.as_matrix().unwrap().entries(), &[19.0, 22.0, 43.0, 50.0]);

        let v = Value::Matrix(m(3, 1, &[1.0, 2.0, 3.0]));
        let err = MatmulFn.call(&[a, v], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::DIMENSION_MISMATCH);
    }

    #[test]
    fn test_scale_fn_arg_types() {
        let ctx = EvalContext::new();
        let a = Value::Matrix(m(1, 1, &[2.0]));
        let err = ScaleFn.call(&[a.clone(), a], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::ARG_TYPE);
    }
}
