//! Helper functions for unpacking plugin arguments

use echelon_core::{codes, EchelonError, Matrix, PivotRule, Value};
use echelon_plugin::EvalContext;

/// Forward an upstream error value, noting which argument carried it
fn upstream(value: &Value, func: &str, arg: &str) -> Option<EchelonError> {
    value
        .as_error()
        .map(|e| e.clone().with_note(format!("in {}() argument '{}'", func, arg)))
}

/// Extract a number from a Value
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, EchelonError> {
    if let Some(e) = upstream(value, func, arg) {
        return Err(e);
    }
    value
        .as_number()
        .ok_or_else(|| EchelonError::arg_type(func, arg, "Number", value.type_name()))
}

/// Extract a non-negative integer from a Value
pub fn extract_usize(value: &Value, func: &str, arg: &str) -> Result<usize, EchelonError> {
    let n = extract_number(value, func, arg)?;
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(EchelonError::domain_error(format!(
            "{}: {} must be a non-negative integer, got {}",
            func, arg, n
        )));
    }
    Ok(n as usize)
}

/// Extract a row index that is valid for `m`
pub fn extract_row(value: &Value, m: &Matrix, func: &str, arg: &str) -> Result<usize, EchelonError> {
    let n = extract_number(value, func, arg)?;
    if n < 0.0 || n.fract() != 0.0 || n >= m.rows() as f64 {
        return Err(EchelonError::new(
            codes::INVALID_ROW_INDEX,
            format!("{}: {} = {} is not a row of a {}×{} matrix", func, arg, n, m.rows(), m.columns()),
        )
        .with_suggestion(format!("Row indexes start at 0 and must be below {}", m.rows())));
    }
    Ok(n as usize)
}

/// Extract a matrix from a Value
pub fn extract_matrix<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a Matrix, EchelonError> {
    if let Some(e) = upstream(value, func, arg) {
        return Err(e);
    }
    value
        .as_matrix()
        .ok_or_else(|| EchelonError::arg_type(func, arg, "Matrix", value.type_name()))
}

/// Collect numbers either from the argument list itself or from a single List
pub fn extract_number_list(values: &[Value], func: &str, arg: &str) -> Result<Vec<f64>, EchelonError> {
    let items = match values {
        [Value::List(items)] => items.as_slice(),
        _ => values,
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| extract_number(v, func, &format!("{}[{}]", arg, i)))
        .collect()
}

/// Pivot rule from an optional Text argument, falling back to the context
pub fn extract_pivot_rule(value: Option<&Value>, ctx: &EvalContext, func: &str) -> Result<PivotRule, EchelonError> {
    match value {
        None | Some(Value::Null) => Ok(ctx.pivot_rule),
        Some(Value::Text(s)) => PivotRule::from_str(s).ok_or_else(|| {
            EchelonError::domain_error(format!("{}: unknown pivot rule '{}'", func, s))
                .with_suggestion("Use 'largest' or 'magnitude'")
        }),
        Some(other) => {
            if let Some(e) = upstream(other, func, "pivot") {
                return Err(e);
            }
            Err(EchelonError::arg_type(func, "pivot", "Text", other.type_name()))
        }
    }
}

/// Check that the argument count lies in `min..=max`
pub fn check_arg_range(func: &str, args: &[Value], min: usize, max: usize) -> Result<(), EchelonError> {
    if args.len() < min || args.len() > max {
        let expected = if args.len() < min { min } else { max };
        return Err(EchelonError::arg_count(func, expected, args.len()));
    }
    Ok(())
}
