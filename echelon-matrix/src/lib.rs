//! Echelon Matrix - Row reduction and small dense linear algebra
//!
//! Provides the algorithms and their registry functions:
//! - Construction (matrix, vector, identity)
//! - Access (get, rows, cols)
//! - Elementary row operations (row_swap, row_scale, row_combine)
//! - Reduction (ref, rref) with a selectable pivot rule
//! - Properties (rank, nullity)
//! - Arithmetic (add, sub, scale, matmul)
//! - Vector geometry (dot, length, unit, angle, project, perp, cross)
//!
//! Every algorithm is a pure function over `&Matrix` returning a fresh value.
//! The `*Fn` plugin wrappers unpack `Value` arguments and turn failures into
//! `Value::Error`.

mod helpers;
mod construct;
mod row_ops;
mod echelon;
mod props;
mod ops;
mod vector_ops;
mod interop;

pub use row_ops::{row_swap, row_scale, row_combine};
pub use echelon::{
    argmax_in_column, argmax_in_column_with, row_echelon, row_echelon_with,
    reduced_row_echelon, reduced_row_echelon_with,
};
pub use props::{rank, rank_with, nullity, nullity_with};
pub use ops::{add, subtract, add_sub, scalar_multiply, multiply, AddSub};
pub use vector_ops::{
    dot_product, length, unit_vector, angle_between, projection, perpendicular, cross_product,
};
pub use interop::{to_dmatrix, from_dmatrix};

use echelon_plugin::PluginRegistry;

/// Load matrix functions into registry
pub fn load_matrix_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Construction
        .with_function(construct::MatrixFn)
        .with_function(construct::VectorFn)
        .with_function(construct::IdentityFn)

        // Access
        .with_function(props::GetFn)
        .with_function(props::RowsFn)
        .with_function(props::ColsFn)

        // Row operations
        .with_function(row_ops::RowSwapFn)
        .with_function(row_ops::RowScaleFn)
        .with_function(row_ops::RowCombineFn)

        // Reduction
        .with_function(echelon::RefFn)
        .with_function(echelon::RrefFn)
        .with_function(props::RankFn)
        .with_function(props::NullityFn)

        // Arithmetic
        .with_function(ops::MatAddFn)
        .with_function(ops::MatSubFn)
        .with_function(ops::ScaleFn)
        .with_function(ops::MatmulFn)

        // Vector operations
        .with_function(vector_ops::DotFn)
        .with_function(vector_ops::LengthFn)
        .with_function(vector_ops::UnitFn)
        .with_function(vector_ops::AngleFn)
        .with_function(vector_ops::ProjectFn)
        .with_function(vector_ops::PerpFn)
        .with_function(vector_ops::CrossFn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use echelon_core::{codes, PivotRule, Value};
    use echelon_plugin::EvalContext;

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().map(|&x| Value::Number(x)).collect()
    }

    #[test]
    fn test_load_matrix_library() {
        let registry = load_matrix_library(PluginRegistry::new());

        for name in [
            "matrix", "vector", "identity", "get", "rows", "cols",
            "row_swap", "row_scale", "row_combine", "ref", "rref", "rank", "nullity",
            "add", "sub", "scale", "matmul",
            "dot", "length", "unit", "angle", "project", "perp", "cross",
        ] {
            assert!(registry.get_function(name).is_some(), "missing {}", name);
        }
        assert_eq!(registry.len(), 24);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let registry = load_matrix_library(PluginRegistry::new());
        assert!(registry.get_function("RREF").is_some());
    }

    #[test]
    fn test_unknown_function_suggests() {
        let registry = load_matrix_library(PluginRegistry::new());
        let result = registry.call_function("rrf", &[], &EvalContext::new());
        let err = result.as_error().unwrap();
        assert_eq!(err.code, codes::UNDEFINED_FUNC);
        assert!(err.suggestion.as_deref().unwrap_or("").contains("ref"));
    }

    #[test]
    fn test_solve_augmented_system_through_registry() {
        // x + y = 3, x - y = 1  →  x = 2, y = 1
        let registry = load_matrix_library(PluginRegistry::new());
        let ctx = EvalContext::new();
        let mut args = nums(&[2.0, 3.0]);
        args.extend(nums(&[1.0, 1.0, 3.0, 1.0, -1.0, 1.0]));

        let system = registry.call_function("matrix", &args, &ctx);
        let reduced = registry.call_function("rref", &[system.clone()], &ctx);
        let reduced = reduced.as_matrix().unwrap();
        assert_eq!(reduced.get(0, 2), Some(2.0));
        assert_eq!(reduced.get(1, 2), Some(1.0));

        assert_eq!(registry.call_function("rank", &[system], &ctx), Value::Number(2.0));
    }

    #[test]
    fn test_oversized_construction_returns_error_value() {
        let registry = load_matrix_library(PluginRegistry::new());
        let ctx = EvalContext::new();

        let m = registry.call_function("matrix", &nums(&[1e19, 2.0, 1.0]), &ctx);
        assert_eq!(m.as_error().unwrap().code, codes::INVALID_SHAPE);

        let i = registry.call_function("identity", &nums(&[1e10]), &ctx);
        assert_eq!(i.as_error().unwrap().code, codes::INVALID_SHAPE);
    }

    #[test]
    fn test_errors_flow_through_nested_calls() {
        let registry = load_matrix_library(PluginRegistry::new());
        let ctx = EvalContext::new();

        let zero = registry.call_function("vector", &nums(&[0.0, 0.0]), &ctx);
        let unit = registry.call_function("unit", &[zero], &ctx);
        let length = registry.call_function("length", &[unit], &ctx);

        let err = length.as_error().unwrap();
        assert_eq!(err.code, codes::ZERO_VECTOR);
        assert_eq!(err.notes, vec!["in length() argument 'v'".to_string()]);
    }

    #[test]
    fn test_context_pivot_rule_reaches_rank() {
        let registry = load_matrix_library(PluginRegistry::new());
        let a = Value::Matrix(echelon_core::Matrix::from_slice(2, 2, &[0.0, 1.0, -2.0, 3.0]).unwrap());

        let literal = EvalContext::new();
        assert_eq!(registry.call_function("rank", &[a.clone()], &literal), Value::Number(1.0));

        let magnitude = EvalContext::new().with_pivot_rule(PivotRule::LargestMagnitude);
        assert_eq!(registry.call_function("rank", &[a.clone()], &magnitude), Value::Number(2.0));

        let explicit = [a, Value::Text("magnitude".into())];
        assert_eq!(registry.call_function("rank", &explicit, &literal), Value::Number(2.0));
    }

    #[test]
    fn test_call_traced_records_steps() {
        let registry = load_matrix_library(PluginRegistry::new());
        let mut ctx = EvalContext::new().with_tracing(true);

        let i = registry.call_traced("identity", &nums(&[2.0]), &mut ctx);
        registry.call_traced("Rank", &[i], &mut ctx);

        let names: Vec<&str> = ctx.trace.iter().map(|s| s.function.as_str()).collect();
        assert_eq!(names, vec!["identity", "rank"]);
        assert_eq!(ctx.trace[1].result, Value::Number(2.0));
    }

    #[test]
    fn test_result_serializes_as_tagged_json() {
        let registry = load_matrix_library(PluginRegistry::new());
        let ctx = EvalContext::new();
        let product = registry.call_function(
            "matmul",
            &[
                Value::Matrix(echelon_core::Matrix::from_slice(1, 2, &[1.0, 2.0]).unwrap()),
                Value::Matrix(echelon_core::Matrix::from_slice(2, 1, &[3.0, 4.0]).unwrap()),
            ],
            &ctx,
        );

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"], "Matrix");
        assert_eq!(json["value"]["rows"], 1);
        assert_eq!(json["value"]["entries"][0], 11.0);

        let err = registry.call_function("cross", &nums(&[1.0]), &ctx);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Error");
        assert_eq!(json["value"]["code"], codes::ARG_COUNT);
    }

    #[test]
    fn test_list_functions_by_category() {
        let registry = load_matrix_library(PluginRegistry::new());
        let vector_fns: Vec<&str> = registry
            .list_functions(Some("matrix/vector"))
            .iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(vector_fns, vec!["angle", "cross", "dot", "length", "perp", "project", "unit"]);
    }
}
