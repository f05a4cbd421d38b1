//! Symbol table: the type and function declarations of a program.
//!
//! Classes are type symbols whose type is a struct; their declared bases
//! live on the struct type. Methods are ordinary function symbols named
//! `<class>.<member>`, so "does class C implement member m" is a name lookup.

use crate::errors::ModelError;
use crate::interner::{StringId, StringInterner};
use crate::ir::expr::Expression;
use crate::ir::source_location::SourceLocation;
use crate::ir::types::{StructType, Type};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: StringId,
    pub base_name: Option<StringId>,
    pub ty: Type,
    /// Type declarations carry their type in `ty` and have no value.
    pub is_type: bool,
    pub location: SourceLocation,
}

impl Symbol {
    pub fn new(name: StringId, ty: Type) -> Self {
        Self {
            name,
            base_name: None,
            ty,
            is_type: false,
            location: SourceLocation::default(),
        }
    }

    pub fn new_type(name: StringId, ty: Type) -> Self {
        Self {
            is_type: true,
            ..Self::new(name, ty)
        }
    }

    pub fn symbol_expr(&self) -> Expression {
        Expression::symbol(self.name, self.ty.clone())
    }
}

/// A concrete method implementation found in the symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    /// Symbol name of the implementation, e.g. `Derived.run`.
    pub identifier: StringId,
    pub ty: Type,
    /// Class the implementation was found on.
    pub class: StringId,
}

impl FunctionRef {
    /// Callee expression for a direct call to this implementation.
    pub fn symbol_expr(&self) -> Expression {
        Expression::Symbol {
            identifier: self.identifier,
            ty: self.ty.clone(),
            class: Some(self.class),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    interner: Arc<StringInterner>,
    symbols: IndexMap<StringId, Symbol, FxBuildHasher>,
}

impl SymbolTable {
    pub fn new(interner: Arc<StringInterner>) -> Self {
        Self {
            interner,
            symbols: IndexMap::default(),
        }
    }

    pub fn interner(&self) -> &Arc<StringInterner> {
        &self.interner
    }

    pub fn intern(&self, value: &str) -> StringId {
        self.interner.get_or_intern(value)
    }

    pub fn resolve(&self, id: StringId) -> Arc<str> {
        self.interner.resolve(id)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Add a symbol; fails if the name is taken.
    pub fn add(&mut self, symbol: Symbol) -> Result<(), ModelError> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(ModelError::DuplicateSymbol(
                self.resolve(symbol.name).to_string(),
            ));
        }
        self.symbols.insert(symbol.name, symbol);
        Ok(())
    }

    pub fn lookup(&self, name: StringId) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    pub fn lookup_str(&self, name: &str) -> Option<&Symbol> {
        self.interner.get(name).and_then(|id| self.lookup(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn is_aggregate_type(&self, name: StringId) -> bool {
        self.struct_type(name).is_some()
    }

    /// Struct type declared under `name`, if `name` is a class.
    pub fn struct_type(&self, name: StringId) -> Option<&StructType> {
        self.lookup(name)
            .filter(|symbol| symbol.is_type)
            .and_then(|symbol| symbol.ty.as_struct())
    }

    /// Declared bases of `name` in declaration order, skipping empty names.
    pub fn base_types(&self, name: StringId) -> Vec<StringId> {
        self.struct_type(name)
            .map(|st| {
                st.base_identifiers()
                    .filter(|base| !self.resolve(*base).is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Implementation of `member` declared directly on `class`, if any.
    pub fn lookup_member(&self, class: StringId, member: StringId) -> Option<FunctionRef> {
        let name = format!("{}.{}", self.resolve(class), self.resolve(member));
        let symbol = self.lookup_str(&name)?;
        Some(FunctionRef {
            identifier: symbol.name,
            ty: symbol.ty.clone(),
            class,
        })
    }

    /// Resolve symbol-type references until a non-symbol type is reached.
    ///
    /// Unknown names and reference cycles stop the walk at the last symbol type.
    pub fn follow<'a>(&'a self, mut ty: &'a Type) -> &'a Type {
        for _ in 0..=self.symbols.len() {
            let Type::Symbol(identifier) = ty else {
                return ty;
            };
            match self.lookup(*identifier).filter(|s| s.is_type) {
                Some(symbol) => ty = &symbol.ty,
                None => return ty,
            }
        }
        ty
    }

    /// Type equality modulo top-level symbol references.
    pub fn type_eq(&self, a: &Type, b: &Type) -> bool {
        a == b || self.follow(a) == self.follow(b)
    }
}
