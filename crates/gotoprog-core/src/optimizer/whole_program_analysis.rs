//! Whole-program analysis shared across passes
//!
//! Built once per program generation from the symbol table, then handed to
//! every pass that needs it through `Arc`. Any change to the set of declared
//! types invalidates it.

use crate::config::PassConfig;
use crate::optimizer::analysis::ClassHierarchy;
use crate::symbol_table::SymbolTable;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct WholeProgramAnalysis {
    /// Class hierarchy for devirtualization
    pub class_hierarchy: Arc<ClassHierarchy>,
}

impl WholeProgramAnalysis {
    /// Build the analysis for `symbol_table`.
    ///
    /// The hierarchy is only computed when devirtualization is enabled.
    pub fn build(symbol_table: &SymbolTable, config: &PassConfig) -> Self {
        let class_hierarchy = if config.devirtualize {
            ClassHierarchy::build(symbol_table)
        } else {
            ClassHierarchy::new(symbol_table.interner().clone())
        };

        Self {
            class_hierarchy: Arc::new(class_hierarchy),
        }
    }
}
