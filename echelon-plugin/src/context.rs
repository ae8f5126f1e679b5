//! Evaluation Context

use echelon_core::{PivotRule, Value};
use std::env;
use tracing::warn;

/// Environment variable selecting the default pivot rule
pub const PIVOT_ENV: &str = "ECHELON_PIVOT";
/// Environment variable enabling call tracing
pub const TRACE_ENV: &str = "ECHELON_TRACE";

/// Evaluation context passed to plugins
#[derive(Debug, Clone)]
pub struct EvalContext {
    pub pivot_rule: PivotRule,
    pub tracing: bool,
    pub trace: Vec<TraceStep>,
}

/// Single recorded call
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub function: String,
    pub args: Vec<Value>,
    pub result: Value,
}

impl EvalContext {
    pub fn new() -> Self {
        Self {
            pivot_rule: PivotRule::default(),
            tracing: false,
            trace: Vec::new(),
        }
    }

    /// Context configured from `ECHELON_PIVOT` and `ECHELON_TRACE`.
    ///
    /// Unparseable settings are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut ctx = Self::new();

        if let Some(raw) = lookup(PIVOT_ENV) {
            match PivotRule::from_str(&raw) {
                Some(rule) => ctx.pivot_rule = rule,
                None => warn!(var = PIVOT_ENV, value = %raw, "unknown pivot rule, keeping default"),
            }
        }

        if let Some(raw) = lookup(TRACE_ENV) {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => ctx.tracing = true,
                "0" | "false" | "no" | "off" | "" => ctx.tracing = false,
                _ => warn!(var = TRACE_ENV, value = %raw, "unrecognised flag, tracing stays off"),
            }
        }

        ctx
    }

    pub fn with_pivot_rule(mut self, rule: PivotRule) -> Self {
        self.pivot_rule = rule;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    pub fn record_trace(&mut self, function: String, args: Vec<Value>, result: Value) {
        if self.tracing {
            self.trace.push(TraceStep { function, args, result });
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.pivot_rule, PivotRule::Largest);
        assert!(!ctx.tracing);
    }

    #[test]
    fn test_from_lookup() {
        let ctx = EvalContext::from_lookup(lookup(&[(PIVOT_ENV, "magnitude"), (TRACE_ENV, "1")]));
        assert_eq!(ctx.pivot_rule, PivotRule::LargestMagnitude);
        assert!(ctx.tracing);
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let ctx = EvalContext::from_lookup(lookup(&[(PIVOT_ENV, "sideways"), (TRACE_ENV, "maybe")]));
        assert_eq!(ctx.pivot_rule, PivotRule::Largest);
        assert!(!ctx.tracing);
    }

    #[test]
    fn test_record_trace_only_when_enabled() {
        let mut ctx = EvalContext::new();
        ctx.record_trace("rank".into(), vec![], Value::Number(1.0));
        assert!(ctx.trace.is_empty());

        let mut ctx = ctx.with_tracing(true);
        ctx.record_trace("rank".into(), vec![], Value::Number(1.0));
        assert_eq!(ctx.trace.len(), 1);
        assert_eq!(ctx.trace[0].function, "rank");
    }
}
