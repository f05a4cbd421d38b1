//! Access to an object's runtime class identifier.
//!
//! Objects embed their base-class sub-object as the first component, and the
//! root class begins with the class identifier member. Reading the
//! identifier therefore means dereferencing the receiver and following first
//! components until the identifier member is reached.

use super::expr::Expression;
use super::types::Type;
use crate::interner::StringId;
use crate::symbol_table::SymbolTable;

pub const CLASS_IDENTIFIER_FIELD: &str = "@class_identifier";

/// Expression reading the class identifier of the object `this_expr` points to.
///
/// A receiver that does not point to a struct (e.g. `void *`) is first cast
/// to a pointer to `suggested_class`.
///
/// # Panics
///
/// Panics if `this_expr` is not of pointer type.
pub fn class_identifier_field(
    this_expr: &Expression,
    suggested_class: StringId,
    field: StringId,
    symbol_table: &SymbolTable,
) -> Expression {
    let this_type = this_expr.ty();
    let points_to = this_type
        .subtype()
        .unwrap_or_else(|| panic!("receiver of a virtual call is not a pointer: {:?}", this_type));

    let pointer = if symbol_table.follow(points_to).as_struct().is_some() {
        this_expr.clone()
    } else {
        this_expr
            .clone()
            .typecast(Type::pointer(Type::symbol(suggested_class)))
    };

    build_class_identifier(Expression::dereference(pointer), field, symbol_table)
}

fn build_class_identifier(
    src: Expression,
    field: StringId,
    symbol_table: &SymbolTable,
) -> Expression {
    let mut expr = src;
    // Each step descends one base-class level; the chain is bounded by the
    // number of declared types.
    for _ in 0..=symbol_table.len() {
        let ty = expr.ty();
        let first = symbol_table
            .follow(&ty)
            .as_struct()
            .and_then(|st| st.components.first());

        match first {
            Some(component) if component.name == field => {
                return Expression::member(expr, field, component.ty.clone());
            }
            Some(component) => {
                expr = Expression::member(expr, component.name, component.ty.clone());
            }
            None => break,
        }
    }
    // Layout unknown: read the field off whatever we reached.
    Expression::member(expr, field, Type::String)
}
