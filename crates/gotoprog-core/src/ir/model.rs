//! A model is a symbol table together with the bodies of its functions.

use super::format::Printer;
use super::functions::{GotoFunction, GotoFunctions};
use crate::errors::ModelError;
use crate::interner::StringId;
use crate::symbol_table::SymbolTable;
use std::fmt;

#[derive(Debug, Clone)]
pub struct GotoModel {
    pub symbol_table: SymbolTable,
    pub goto_functions: GotoFunctions,
}

impl GotoModel {
    pub fn new(symbol_table: SymbolTable, goto_functions: GotoFunctions) -> Self {
        Self {
            symbol_table,
            goto_functions,
        }
    }

    /// Add a function body under `name`.
    ///
    /// A placeholder without a body may be replaced; an existing body may not.
    pub fn add_function(
        &mut self,
        name: &str,
        function: GotoFunction,
    ) -> Result<StringId, ModelError> {
        let id = self.symbol_table.intern(name);
        if self
            .goto_functions
            .get(id)
            .is_some_and(GotoFunction::body_available)
        {
            return Err(ModelError::DuplicateFunction(name.to_string()));
        }
        self.goto_functions.insert(id, function);
        Ok(id)
    }

    pub fn remove_function(&mut self, name: &str) -> Result<GotoFunction, ModelError> {
        self.symbol_table
            .interner()
            .get(name)
            .and_then(|id| self.goto_functions.remove(id))
            .ok_or_else(|| ModelError::UnknownFunction(name.to_string()))
    }
}

impl fmt::Display for GotoModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let printer = Printer::new(self.symbol_table.interner());
        for (name, function) in self.goto_functions.iter() {
            if !function.body_available() {
                continue;
            }
            let name = self.symbol_table.resolve(name);
            writeln!(f, "{} /* {} */", name, name)?;
            printer.write_program(f, &function.body)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
