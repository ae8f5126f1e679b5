//! Column-vector operations
//!
//! A vector is an n×1 matrix. Every function here rejects wider operands
//! with `NotAVector` before looking at lengths.

use echelon_core::{Matrix, MatrixError, Value, EchelonError};
use echelon_plugin::{FunctionPlugin, FunctionMeta, ArgMeta, EvalContext};
use crate::helpers::extract_matrix;
use crate::ops::{scalar_multiply, subtract};

fn require_vector(v: &Matrix) -> Result<(), MatrixError> {
    if v.is_vector() {
        Ok(())
    } else {
        Err(MatrixError::NotAVector { rows: v.rows(), columns: v.columns() })
    }
}

fn require_pair(op: &'static str, u: &Matrix, v: &Matrix) -> Result<(), MatrixError> {
    require_vector(u)?;
    require_vector(v)?;
    if u.rows() != v.rows() {
        return Err(MatrixError::DimensionMismatch { op, left: u.shape(), right: v.shape() });
    }
    Ok(())
}

fn dot_unchecked(u: &Matrix, v: &Matrix) -> f64 {
    u.entries().iter().zip(v.entries()).map(|(a, b)| a * b).sum()
}

/// Sum of elementwise products
pub fn dot_product(u: &Matrix, v: &Matrix) -> Result<f64, MatrixError> {
    require_pair("dot", u, v)?;
    Ok(dot_unchecked(u, v))
}

/// Euclidean length
pub fn length(v: &Matrix) -> Result<f64, MatrixError> {
    require_vector(v)?;
    let squared = dot_unchecked(v, v);
    Ok(if squared < 0.0 { 0.0 } else { squared.sqrt() })
}

/// `v / |v|`
pub fn unit_vector(v: &Matrix) -> Result<Matrix, MatrixError> {
    let len = length(v)?;
    if len == 0.0 {
        return Err(MatrixError::ZeroVector { op: "unit" });
    }
    Ok(scalar_multiply(1.0 / len, v))
}

/// Angle between two vectors in radians, in `[0, π]`
pub fn angle_between(u: &Matrix, v: &Matrix) -> Result<f64, MatrixError> {
    require_pair("angle", u, v)?;
    let denom = length(u)? * length(v)?;
    if denom == 0.0 {
        return Err(MatrixError::ZeroVector { op: "angle" });
    }
    let ratio = dot_unchecked(u, v) / denom;
    Ok(ratio.clamp(-1.0, 1.0).acos())
}

/// Projection of `u` onto `v`
pub fn projection(u: &Matrix, v: &Matrix) -> Result<Matrix, MatrixError> {
    require_pair("project", u, v)?;
    let len = length(v)?;
    if len == 0.0 {
        return Err(MatrixError::ZeroVector { op: "project" });
    }
    let unit = scalar_multiply(1.0 / len, v);
    Ok(scalar_multiply(dot_unchecked(u, &unit), &unit))
}

/// Component of `u` orthogonal to `v`: `u - proj_v(u)`
pub fn perpendicular(u: &Matrix, v: &Matrix) -> Result<Matrix, MatrixError> {
    let proj = projection(u, v).map_err(|e| match e {
        MatrixError::ZeroVector { .. } => MatrixError::ZeroVector { op: "perp" },
        MatrixError::DimensionMismatch { left, right, .. } => {
            MatrixError::DimensionMismatch { op: "perp", left, right }
        }
        other => other,
    })?;
    subtract(u, &proj)
}

/// Cross product of two vectors in R³
pub fn cross_product(u: &Matrix, v: &Matrix) -> Result<Matrix, MatrixError> {
    require_vector(u)?;
    require_vector(v)?;
    for w in [u, v] {
        if w.rows() != 3 {
            return Err(MatrixError::WrongDimension { expected: 3, got: w.rows() });
        }
    }
    let (a, b) = (u.entries(), v.entries());
    let entries = vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ];
    Ok(Matrix::from_parts(3, 1, entries))
}

// ============================================================================
// Plugins
// ============================================================================

static PAIR_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("u", "Matrix", "First column vector"),
    ArgMeta::required("v", "Matrix", "Second column vector (same length)"),
];
static SINGLE_ARGS: [ArgMeta; 1] = [ArgMeta::required("v", "Matrix", "Column vector")];

fn binary<'a>(func: &str, args: &'a [Value]) -> Result<(&'a Matrix, &'a Matrix), EchelonError> {
    if args.len() != 2 {
        return Err(EchelonError::arg_count(func, 2, args.len()));
    }
    Ok((extract_matrix(&args[0], func, "u")?, extract_matrix(&args[1], func, "v")?))
}

fn unary<'a>(func: &str, args: &'a [Value]) -> Result<&'a Matrix, EchelonError> {
    if args.len() != 1 {
        return Err(EchelonError::arg_count(func, 1, args.len()));
    }
    extract_matrix(&args[0], func, "v")
}

pub struct DotFn;

static DOT_EXAMPLES: [&str; 1] = ["dot(vector(1, 2, 3), vector(4, 5, 6)) → 32"];
static DOT_RELATED: [&str; 3] = ["length", "angle", "project"];

impl FunctionPlugin for DotFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "dot",
            description: "Dot product of two column vectors",
            usage: "dot(u, v)",
            args: &PAIR_ARGS,
            returns: "Number",
            examples: &DOT_EXAMPLES,
            category: "matrix/vector",
            related: &DOT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let (u, v) = match binary("dot", args) {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };
        dot_product(u, v).into()
    }
}

pub struct LengthFn;

static LENGTH_EXAMPLES: [&str; 1] = ["length(vector(3, 4)) → 5"];
static LENGTH_RELATED: [&str; 2] = ["unit", "dot"];

impl FunctionPlugin for LengthFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "length",
            description: "Euclidean length of a column vector",
            usage: "length(v)",
            args: &SINGLE_ARGS,
            returns: "Number",
            examples: &LENGTH_EXAMPLES,
            category: "matrix/vector",
            related: &LENGTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let v = match unary("length", args) {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        length(v).into()
    }
}

pub struct UnitFn;

static UNIT_EXAMPLES: [&str; 1] = ["unit(vector(3, 4)) → [0.6, 0.8]ᵀ"];
static UNIT_RELATED: [&str; 2] = ["length", "project"];

impl FunctionPlugin for UnitFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit",
            description: "Unit vector in the direction of v",
            usage: "unit(v)",
            args: &SINGLE_ARGS,
            returns: "Matrix",
            examples: &UNIT_EXAMPLES,
            category: "matrix/vector",
            related: &UNIT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let v = match unary("unit", args) {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        unit_vector(v).into()
    }
}

pub struct AngleFn;

static ANGLE_EXAMPLES: [&str; 1] = ["angle(vector(1, 0), vector(0, 1)) → 1.5707963267948966"];
static ANGLE_RELATED: [&str; 2] = ["dot", "length"];

impl FunctionPlugin for AngleFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "angle",
            description: "Angle between two column vectors, in radians",
            usage: "angle(u, v)",
            args: &PAIR_ARGS,
            returns: "Number",
            examples: &ANGLE_EXAMPLES,
            category: "matrix/vector",
            related: &ANGLE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let (u, v) = match binary("angle", args) {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };
        angle_between(u, v).into()
    }
}

pub struct ProjectFn;

static PROJECT_EXAMPLES: [&str; 1] = ["project(vector(2, 3), vector(1, 0)) → [2, 0]ᵀ"];
static PROJECT_RELATED: [&str; 2] = ["perp", "unit"];

impl FunctionPlugin for ProjectFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "project",
            description: "Projection of u onto v",
            usage: "project(u, v)",
            args: &PAIR_ARGS,
            returns: "Matrix",
            examples: &PROJECT_EXAMPLES,
            category: "matrix/vector",
            related: &PROJECT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let (u, v) = match binary("project", args) {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };
        projection(u, v).into()
    }
}

pub struct PerpFn;

static PERP_EXAMPLES: [&str; 1] = ["perp(vector(2, 3), vector(1, 0)) → [0, 3]ᵀ"];
static PERP_RELATED: [&str; 1] = ["project"];

impl FunctionPlugin for PerpFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "perp",
            description: "Component of u orthogonal to v",
            usage: "perp(u, v)",
            args: &PAIR_ARGS,
            returns: "Matrix",
            examples: &PERP_EXAMPLES,
            category: "matrix/vector",
            related: &PERP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let (u, v) = match binary("perp", args) {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };
        perpendicular(u, v).into()
    }
}

pub struct CrossFn;

static CROSS_EXAMPLES: [&str; 1] = ["cross(vector(1, 0, 0), vector(0, 1, 0)) → [0, 0, 1]ᵀ"];
static CROSS_RELATED: [&str; 1] = ["dot"];

impl FunctionPlugin for CrossFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "cross",
            description: "Cross product of two vectors in R³",
            usage: "cross(u, v)",
            args: &PAIR_ARGS,
            returns: "Matrix",
            examples: &CROSS_EXAMPLES,
            category: "matrix/vector",
            related: &CROSS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let (u, v) = match binary("cross", args) {
            Ok(pair) => pair,
            Err(e) => return Value::Error(e),
        };
        cross_product(u, v).into()
    }
}
