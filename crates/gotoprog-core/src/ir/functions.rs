//! The function table: function name → goto-program body.

use super::program::GotoProgram;
use super::types::CodeType;
use crate::interner::StringId;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Name of the synthetic entry point that calls `main` after initialization.
pub const ENTRY_POINT: &str = "__CPROVER__start";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GotoFunction {
    pub body: GotoProgram,
    pub ty: Option<CodeType>,
    pub parameter_identifiers: Vec<StringId>,
}

impl GotoFunction {
    pub fn new(body: GotoProgram) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// Declared-but-undefined functions have an empty body.
    pub fn body_available(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Insertion-ordered function table.
#[derive(Debug, Clone, Default)]
pub struct GotoFunctions {
    function_map: IndexMap<StringId, GotoFunction, FxBuildHasher>,
}

impl GotoFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.function_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.function_map.is_empty()
    }

    pub fn contains(&self, name: StringId) -> bool {
        self.function_map.contains_key(&name)
    }

    pub fn get(&self, name: StringId) -> Option<&GotoFunction> {
        self.function_map.get(&name)
    }

    pub fn get_mut(&mut self, name: StringId) -> Option<&mut GotoFunction> {
        self.function_map.get_mut(&name)
    }

    /// Insert or replace a function, returning the previous definition.
    pub fn insert(&mut self, name: StringId, function: GotoFunction) -> Option<GotoFunction> {
        self.function_map.insert(name, function)
    }

    /// Entry for a declared function; inserts an empty body if it has none yet.
    pub fn insert_placeholder(&mut self, name: StringId) -> &mut GotoFunction {
        self.function_map.entry(name).or_default()
    }

    /// Remove a function, keeping the relative order of the others.
    pub fn remove(&mut self, name: StringId) -> Option<GotoFunction> {
        self.function_map.shift_remove(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = StringId> + '_ {
        self.function_map.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StringId, &GotoFunction)> {
        self.function_map.iter().map(|(name, f)| (*name, f))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StringId, &mut GotoFunction)> {
        self.function_map.iter_mut().map(|(name, f)| (*name, f))
    }

    /// Run `GotoProgram::update` on every body.
    pub fn update(&mut self) {
        for function in self.function_map.values_mut() {
            function.body.update();
        }
    }

    /// Number all instructions of all functions with one running counter.
    pub fn compute_location_numbers(&mut self) {
        let mut next = 0;
        for function in self.function_map.values_mut() {
            next = function.body.compute_location_numbers(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::StringInterner;
    use crate::ir::instruction::InstructionKind;

    #[test]
    fn test_placeholder_keeps_existing_body() {
        let interner = StringInterner::new();
        let name = interner.get_or_intern("f");
        let mut functions = GotoFunctions::new();

        let mut body = GotoProgram::new();
        body.add_instruction(InstructionKind::EndFunction);
        functions.insert(name, GotoFunction::new(body));

        assert!(functions.insert_placeholder(name).body_available());
        let other = interner.get_or_intern("g");
        assert!(!functions.insert_placeholder(other).body_available());
        assert_eq!(functions.len(), 2);
    }

    #[test]
    fn test_global_location_numbers() {
        let interner = StringInterner::new();
        let mut functions = GotoFunctions::new();
        for name in ["a", "b"] {
            let mut body = GotoProgram::new();
            body.add_instruction(InstructionKind::Skip);
            body.add_instruction(InstructionKind::EndFunction);
            functions.insert(interner.get_or_intern(name), GotoFunction::new(body));
        }

        functions.compute_location_numbers();

        let numbers: Vec<u32> = functions
            .iter()
            .flat_map(|(_, f)| f.body.iter().map(|i| i.location_number))
            .collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let interner = StringInterner::new();
        let mut functions = GotoFunctions::new();
        let names: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| interner.get_or_intern(n))
            .collect();
        for name in &names {
            functions.insert_placeholder(*name);
        }

        assert!(functions.remove(names[1]).is_some());
        assert!(functions.remove(names[1]).is_none());
        assert_eq!(functions.names().collect::<Vec<_>>(), vec![names[0], names[2]]);
    }
}
