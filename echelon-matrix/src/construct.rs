//! Matrix and vector construction functions

use echelon_core::{Matrix, Value, EchelonError};
use echelon_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::helpers::{extract_number_list, extract_usize};

/// Rows of a nested `[[...], [...]]` literal
fn nested_rows(items: &[Value], func: &str) -> Result<Vec<Vec<f64>>, EchelonError> {
    items
        .iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::List(values) => extract_number_list(values, func, &format!("data[{}]", i)),
            other => Err(EchelonError::arg_type(func, &format!("data[{}]", i), "List", other.type_name())),
        })
        .collect()
}

// ============ matrix ============

pub struct MatrixFn;

static MATRIX_ARGS: [ArgMeta; 3] = [
    ArgMeta {
        name: "rows",
        typ: "Number",
        description: "Number of rows, or a nested list [[row1], [row2], ...]",
        optional: false,
        default: None,
    },
    ArgMeta {
        name: "cols",
        typ: "Number",
        description: "Number of columns",
        optional: true,
        default: None,
    },
    ArgMeta {
        name: "values",
        typ: "Number...",
        description: "Entries in row-major order, flat or as one list",
        optional: true,
        default: None,
    },
];

static MATRIX_EXAMPLES: [&str; 2] = [
    "matrix(2, 3, 1, 2, 3, 4, 5, 6) → 2×3 matrix",
    "matrix([[1, 2], [3, 4]]) → 2×2 matrix",
];

static MATRIX_RELATED: [&str; 2] = ["vector", "identity"];

impl FunctionPlugin for MatrixFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "matrix",
            description: "Create a matrix from its dimensions and row-major entries",
            usage: "matrix(rows, cols, values...) | matrix(data)",
            args: &MATRIX_ARGS,
            returns: "Matrix",
            examples: &MATRIX_EXAMPLES,
            category: "matrix/construct",
            related: &MATRIX_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let [Value::List(items)] = args {
            return match nested_rows(items, "matrix") {
                Ok(rows) => Matrix::from_rows(rows).into(),
                Err(e) => Value::Error(e),
            };
        }

        if args.len() < 3 {
            return Value::Error(EchelonError::arg_count("matrix", 3, args.len()));
        }

        let rows = match extract_usize(&args[0], "matrix", "rows") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let cols = match extract_usize(&args[1], "matrix", "cols") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let values = match extract_number_list(&args[2..], "matrix", "values") {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };

        Matrix::new(rows, cols, values).into()
    }
}

// ============ vector ============

pub struct VectorFn;

static VECTOR_ARGS: [ArgMeta; 1] = [ArgMeta {
    name: "values",
    typ: "Number...",
    description: "Entries, flat or as one list",
    optional: false,
    default: None,
}];

static VECTOR_EXAMPLES: [&str; 2] = [
    "vector(1, 2, 3) → 3×1 column vector",
    "vector([1, 2, 3]) → 3×1 column vector",
];

static VECTOR_RELATED: [&str; 3] = ["matrix", "dot", "length"];

impl FunctionPlugin for VectorFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "vector",
            description: "Create a column vector",
            usage: "vector(values...)",
            args: &VECTOR_ARGS,
            returns: "Matrix",
            examples: &VECTOR_EXAMPLES,
            category: "matrix/construct",
            related: &VECTOR_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(EchelonError::arg_count("vector", 1, 0));
        }

        match extract_number_list(args, "vector", "values") {
            Ok(values) => Matrix::column_vector(values).into(),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ identity ============

pub struct IdentityFn;

static IDENTITY_ARGS: [ArgMeta; 1] = [ArgMeta::required("n", "Number", "Size of the square matrix")];

static IDENTITY_EXAMPLES: [&str; 1] = ["identity(3) → 3×3 identity"];

static IDENTITY_RELATED: [&str; 2] = ["matrix", "rref"];

impl FunctionPlugin for IdentityFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "identity",
            description: "Create an n×n identity matrix",
            usage: "identity(n)",
            args: &IDENTITY_ARGS,
            returns: "Matrix",
            examples: &IDENTITY_EXAMPLES,
            category: "matrix/construct",
            related: &IDENTITY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 1 {
            return Value::Error(EchelonError::arg_count("identity", 1, args.len()));
        }

        match extract_usize(&args[0], "identity", "n") {
            Ok(n) => Matrix::identity(n).into(),
            Err(e) => Value::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echelon_core::codes;

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().map(|&x| Value::Number(x)).collect()
    }

    #[test]
    fn test_matrix_flat() {
        let ctx = EvalContext::new();
        let result = MatrixFn.call(&nums(&[2.0, 2.0, 1.0, 2.0, 3.0, 4.0]), &ctx);
        let m = result.as_matrix().unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.get(1, 0), Some(3.0));
    }

    #[test]
    fn test_matrix_values_as_list() {
        let ctx = EvalContext::new();
        let args = [Value::Number(1.0), Value::Number(2.0), Value::List(nums(&[5.0, 6.0]))];
        let m = MatrixFn.call(&args, &ctx);
        assert_eq!(m.as_matrix().unwrap().entries(), &[5.0, 6.0]);
    }

    #[test]
    fn test_matrix_nested() {
        let ctx = EvalContext::new();
        let data = Value::List(vec![Value::List(nums(&[1.0, 2.0])), Value::List(nums(&[3.0, 4.0]))]);
        let m = MatrixFn.call(&[data], &ctx);
        assert_eq!(m.as_matrix().unwrap().to_nested(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        let ragged = Value::List(vec![Value::List(nums(&[1.0, 2.0])), Value::List(nums(&[3.0]))]);
        let err = MatrixFn.call(&[ragged], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_SHAPE);
    }

    #[test]
    fn test_matrix_bad_shape() {
        let ctx = EvalContext::new();
        let err = MatrixFn.call(&nums(&[2.0, 2.0, 1.0, 2.0, 3.0]), &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_SHAPE);

        let err = MatrixFn.call(&nums(&[0.0, 2.0, 1.0]), &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_SHAPE);

        let err = MatrixFn.call(&nums(&[2.0, 2.0]), &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::ARG_COUNT);
    }

    #[test]
    fn test_huge_dimensions_are_errors() {
        let ctx = EvalContext::new();
        let err = MatrixFn.call(&nums(&[1e19, 2.0, 1.0]), &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_SHAPE);

        let err = IdentityFn.call(&[Value::Number(1e10)], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_SHAPE);
    }

    #[test]
    fn test_vector() {
        let ctx = EvalContext::new();
        let v = VectorFn.call(&nums(&[1.0, 2.0, 3.0]), &ctx);
        let v = v.as_matrix().unwrap();
        assert!(v.is_vector());
        assert_eq!(v.rows(), 3);

        assert!(VectorFn.call(&[], &ctx).is_error());
        assert!(VectorFn.call(&[Value::Text("x".into())], &ctx).is_error());
    }

    #[test]
    fn test_identity() {
        let ctx = EvalContext::new();
        let i = IdentityFn.call(&[Value::Number(3.0)], &ctx);
        assert_eq!(i, Value::Matrix(Matrix::identity(3).unwrap()));

        let err = IdentityFn.call(&[Value::Number(0.0)], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::INVALID_SHAPE);
        let err = IdentityFn.call(&[Value::Number(-2.0)], &ctx);
        assert_eq!(err.as_error().unwrap().code, codes::DOMAIN_ERROR);
    }
}
