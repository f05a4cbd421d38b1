//! Types of IR expressions and symbols.

use crate::interner::StringId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `void`
    Empty,
    Bool,
    Signed(u32),
    Unsigned(u32),
    String,
    Pointer(Box<Type>),
    /// Reference to a named type in the symbol table.
    Symbol(StringId),
    Struct(StructType),
    Code(CodeType),
}

impl Type {
    pub fn pointer(subtype: Type) -> Self {
        Type::Pointer(Box::new(subtype))
    }

    pub fn symbol(identifier: StringId) -> Self {
        Type::Symbol(identifier)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    /// Pointee of a pointer type.
    pub fn subtype(&self) -> Option<&Type> {
        match self {
            Type::Pointer(subtype) => Some(subtype),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(struct_type) => Some(struct_type),
            _ => None,
        }
    }
}

/// Aggregate (class/struct) type.
///
/// For classes, the first component of a derived class is the base-class
/// sub-object; the root class starts with the class identifier member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructType {
    pub components: Vec<Component>,
    /// Declared bases, in declaration order.
    pub bases: Vec<Type>,
}

impl StructType {
    /// Identifiers of the declared bases. Bases that are not symbol
    /// references cannot be resolved and are skipped.
    pub fn base_identifiers(&self) -> impl Iterator<Item = StringId> + '_ {
        self.bases.iter().filter_map(|base| match base {
            Type::Symbol(identifier) => Some(*identifier),
            _ => None,
        })
    }

    pub fn component(&self, name: StringId) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    pub name: StringId,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeType {
    pub parameters: Vec<Type>,
    pub return_type: Box<Type>,
}

impl CodeType {
    pub fn new(parameters: Vec<Type>, return_type: Type) -> Self {
        Self {
            parameters,
            return_type: Box::new(return_type),
        }
    }
}
