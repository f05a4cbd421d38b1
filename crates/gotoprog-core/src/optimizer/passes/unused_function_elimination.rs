use crate::config::PassConfig;
use crate::errors::PassError;
use crate::interner::{StringId, StringInterner};
use crate::ir::functions::{GotoFunctions, ENTRY_POINT};
use crate::ir::model::GotoModel;
use crate::optimizer::analysis::CallGraph;
use crate::optimizer::GotoPass;
use tracing::{info, warn};

/// Unused Function Elimination
///
/// Drops every function that is not reachable from the entry point through
/// direct calls.
///
/// ## Example
/// ```text
/// __CPROVER__start -> main -> helper
/// unused_helper                        (never called)
///
/// Result: unused_helper is removed from the function table
/// ```
///
/// Virtual calls must be lowered first; a call through anything other than a
/// plain symbol panics.
pub struct UnusedFunctionEliminationPass {
    entry_point: String,
}

impl UnusedFunctionEliminationPass {
    pub fn new(config: &PassConfig) -> Self {
        Self {
            entry_point: config.entry_point.clone(),
        }
    }
}

impl GotoPass for UnusedFunctionEliminationPass {
    fn name(&self) -> &'static str {
        "unused-function-elimination"
    }

    fn run(&mut self, model: &mut GotoModel) -> Result<bool, PassError> {
        let entry = model
            .symbol_table
            .interner()
            .get(&self.entry_point)
            .filter(|id| model.goto_functions.contains(*id))
            .ok_or_else(|| PassError::MissingEntryPoint(self.entry_point.clone()))?;

        let stats = prune(&mut model.goto_functions, model.symbol_table.interner(), entry);
        Ok(stats.dropped_functions > 0)
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Remove every function unreachable from `entry_point`.
///
/// An entry point missing from the table reaches nothing but itself, so all
/// functions are dropped.
///
/// # Panics
///
/// Panics if a body still contains a virtual call.
pub fn prune(
    functions: &mut GotoFunctions,
    interner: &StringInterner,
    entry_point: StringId,
) -> UnusedFunctionStats {
    if !functions.contains(entry_point) {
        warn!(
            entry = %interner.resolve(entry_point),
            "entry point not found in function table"
        );
    }

    let reachable = CallGraph::build(functions, interner).reachable_from(entry_point);
    let unused: Vec<StringId> = functions
        .names()
        .filter(|name| !reachable.contains(name))
        .collect();

    let stats = UnusedFunctionStats {
        total_functions: functions.len(),
        used_functions: reachable.len(),
        dropped_functions: unused.len(),
    };
    if !unused.is_empty() {
        info!(
            "Dropping {} of {} functions ({} used)",
            stats.dropped_functions, stats.total_functions, stats.used_functions
        );
    }

    for name in unused {
        functions.remove(name);
    }
    stats
}

/// Prune a model from the default entry point.
pub fn remove_unused_functions(model: &mut GotoModel) -> UnusedFunctionStats {
    let entry = model.symbol_table.intern(ENTRY_POINT);
    prune(&mut model.goto_functions, model.symbol_table.interner(), entry)
}

/// Statistics about unused function elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnusedFunctionStats {
    pub total_functions: usize,
    /// Functions reached from the entry point, counting callees without a body.
    pub used_functions: usize,
    pub dropped_functions: usize,
}

impl std::fmt::Display for UnusedFunctionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Functions: {} total, {} used, {} dropped",
            self.total_functions, self.used_functions, self.dropped_functions
        )
    }
}
