//! Direct-call graph over a function table.

use crate::interner::{StringId, StringInterner};
use crate::ir::functions::GotoFunctions;
use crate::ir::program::GotoProgram;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

/// Caller → callees, one entry per function in the table.
#[derive(Debug, Default, Clone)]
pub struct CallGraph {
    edges: IndexMap<StringId, Vec<StringId>, FxBuildHasher>,
}

impl CallGraph {
    /// Build the graph of direct calls.
    ///
    /// # Panics
    ///
    /// Panics on a call whose callee is not a plain symbol. Virtual calls
    /// must be lowered before the graph is built.
    pub fn build(functions: &GotoFunctions, interner: &StringInterner) -> Self {
        let mut edges = IndexMap::default();
        for (name, function) in functions.iter() {
            edges.insert(name, direct_callees(interner, name, &function.body));
        }
        Self { edges }
    }

    pub fn callees(&self, function: StringId) -> &[StringId] {
        self.edges
            .get(&function)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every function reachable from `entry`, including `entry` itself and
    /// callees with no entry in the table.
    pub fn reachable_from(&self, entry: StringId) -> FxHashSet<StringId> {
        let mut seen = FxHashSet::default();
        let mut worklist = vec![entry];
        seen.insert(entry);

        while let Some(function) = worklist.pop() {
            for &callee in self.callees(function) {
                if seen.insert(callee) {
                    worklist.push(callee);
                }
            }
        }
        seen
    }
}

fn direct_callees(
    interner: &StringInterner,
    caller: StringId,
    body: &GotoProgram,
) -> Vec<StringId> {
    let mut callees = Vec::new();
    for instruction in body.iter() {
        let Some(call) = instruction.function_call() else {
            continue;
        };
        let callee = call.function.identifier().unwrap_or_else(|| {
            panic!(
                "call in function `{}` at {} has a non-symbol callee; remove virtual functions first",
                interner.resolve(caller),
                instruction.id()
            )
        });
        if !callees.contains(&callee) {
            callees.push(callee);
        }
    }
    callees
}
