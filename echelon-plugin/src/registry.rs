//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use echelon_core::{EchelonError, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Central plugin registry
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self { functions: HashMap::new() }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, argc = args.len(), "dispatch");
                f.call(args, ctx)
            }
            None => {
                debug!(function = name, "unknown function");
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = EchelonError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Call a function and record the call in the context trace
    pub fn call_traced(&self, name: &str, args: &[Value], ctx: &mut EvalContext) -> Value {
        let result = self.call_function(name, args, ctx);
        ctx.record_trace(name.to_lowercase(), args.to_vec(), result.clone());
        result
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: std::collections::HashSet<char> = query.chars().collect();
        let candidate_chars: std::collections::HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    /// Help text for one function, or a category overview when `name` is None
    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        let Some(f) = self.get_function(name) else {
            return Value::Error(EchelonError::undefined_func(name));
        };
        let meta = f.meta();
        let mut lines = vec![
            format!("{} - {}", meta.name, meta.description),
            format!("usage: {}", meta.usage),
            format!("returns: {}", meta.returns),
        ];
        for arg in meta.args {
            let mut line = format!("  {} ({}): {}", arg.name, arg.typ, arg.description);
            if let Some(default) = arg.default {
                line.push_str(&format!(" [default: {}]", default));
            }
            lines.push(line);
        }
        for example in meta.examples {
            lines.push(format!("  e.g. {}", example));
        }
        Value::Text(lines.join("\n"))
    }

    fn general_help(&self) -> Value {
        let mut by_cat: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for f in self.functions.values() {
            let meta = f.meta();
            by_cat.entry(meta.category).or_default().push(meta.name);
        }
        let mut cats: Vec<_> = by_cat.into_iter().collect();
        cats.sort_by_key(|(cat, _)| *cat);

        let mut lines = Vec::with_capacity(cats.len() + 1);
        for (cat, mut names) in cats {
            names.sort_unstable();
            lines.push(format!("{}: {}", cat, names.join(", ")));
        }
        lines.push("Call help('function_name') for detailed help.".to_string());
        Value::Text(lines.join("\n"))
    }

    /// Metadata of registered functions, sorted by name
    pub fn list_functions(&self, category: Option<&str>) -> Vec<FunctionMeta> {
        let mut metas: Vec<FunctionMeta> = self.functions.values()
            .map(|f| f.meta())
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    /// Full catalog as JSON for front-ends
    pub fn catalog_json(&self) -> serde_json::Value {
        serde_json::json!({ "functions": self.list_functions(None) })
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
