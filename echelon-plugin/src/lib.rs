//! Echelon Plugin System
//!
//! Provides the seam a front-end (command dispatcher, JSON service) drives:
//! - `FunctionPlugin`: a named pure computation with metadata
//! - `PluginRegistry`: name → function lookup, help and catalog
//! - `EvalContext`: configuration handed to every call

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, TraceStep, PIVOT_ENV, TRACE_ENV};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext, TraceStep};
    pub use echelon_core::prelude::*;
}
