//! IR expressions.

use super::types::Type;
use crate::interner::StringId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Reference to a symbol. `class` records the class a method symbol
    /// was resolved for, when it came out of override resolution.
    Symbol {
        identifier: StringId,
        ty: Type,
        class: Option<StringId>,
    },
    Constant {
        value: StringId,
        ty: Type,
    },
    True,
    False,
    Typecast {
        op: Box<Expression>,
        ty: Type,
    },
    Dereference {
        pointer: Box<Expression>,
        ty: Type,
    },
    Member {
        compound: Box<Expression>,
        component: StringId,
        ty: Type,
    },
    Equal(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    /// Callee of a dynamically dispatched call: member `component` looked up
    /// from the static class `class` of the receiver.
    VirtualFunction {
        class: StringId,
        component: StringId,
        ty: Type,
    },
}

impl Expression {
    pub fn symbol(identifier: StringId, ty: Type) -> Self {
        Expression::Symbol {
            identifier,
            ty,
            class: None,
        }
    }

    pub fn string_constant(value: StringId) -> Self {
        Expression::Constant {
            value,
            ty: Type::String,
        }
    }

    pub fn equal(lhs: Expression, rhs: Expression) -> Self {
        Expression::Equal(Box::new(lhs), Box::new(rhs))
    }

    pub fn dereference(pointer: Expression) -> Self {
        let ty = pointer.ty().subtype().cloned().unwrap_or(Type::Empty);
        Expression::Dereference {
            pointer: Box::new(pointer),
            ty,
        }
    }

    pub fn member(compound: Expression, component: StringId, ty: Type) -> Self {
        Expression::Member {
            compound: Box::new(compound),
            component,
            ty,
        }
    }

    /// Wrap `self` in a cast to `ty`.
    pub fn typecast(self, ty: Type) -> Self {
        Expression::Typecast {
            op: Box::new(self),
            ty,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Expression::Symbol { ty, .. }
            | Expression::Constant { ty, .. }
            | Expression::Typecast { ty, .. }
            | Expression::Dereference { ty, .. }
            | Expression::Member { ty, .. }
            | Expression::VirtualFunction { ty, .. } => ty.clone(),
            Expression::True | Expression::False | Expression::Equal(..) | Expression::Not(_) => {
                Type::Bool
            }
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expression::True)
    }

    pub fn is_virtual_function(&self) -> bool {
        matches!(self, Expression::VirtualFunction { .. })
    }

    /// Identifier of a symbol expression.
    pub fn identifier(&self) -> Option<StringId> {
        match self {
            Expression::Symbol { identifier, .. } => Some(*identifier),
            _ => None,
        }
    }
}
