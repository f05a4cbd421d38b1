//! Override resolution
//!
//! Given the static class of a receiver and a member name, find every
//! concrete implementation a virtual call could reach at runtime: the
//! definition visible from the static class itself, plus whatever each
//! descendant class declares or inherits.

use super::class_hierarchy::ClassHierarchy;
use crate::interner::StringId;
use crate::symbol_table::{FunctionRef, SymbolTable};
use rustc_hash::FxHashSet;

/// What a call on a given class resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallTarget {
    Resolved(FunctionRef),
    /// No class on the lookup path declares the member.
    Unresolved,
}

impl CallTarget {
    pub fn is_resolved(&self) -> bool {
        matches!(self, CallTarget::Resolved(_))
    }

    /// Symbol name of the implementation, if resolved.
    pub fn identifier(&self) -> Option<StringId> {
        self.function().map(|f| f.identifier)
    }

    pub fn function(&self) -> Option<&FunctionRef> {
        match self {
            CallTarget::Resolved(function) => Some(function),
            CallTarget::Unresolved => None,
        }
    }
}

/// An implementation reached when the receiver's dynamic class is `class_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFunction {
    pub class_id: StringId,
    pub target: CallTarget,
}

pub struct OverrideResolver<'a> {
    hierarchy: &'a ClassHierarchy,
    symbol_table: &'a SymbolTable,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(hierarchy: &'a ClassHierarchy, symbol_table: &'a SymbolTable) -> Self {
        Self {
            hierarchy,
            symbol_table,
        }
    }

    /// Definition of `member` seen from `static_class`.
    ///
    /// Walks up through the first declared parent only; members reachable
    /// solely through a later base are not found.
    pub fn resolve_definition(&self, static_class: StringId, member: StringId) -> CandidateFunction {
        let mut class = static_class;
        let mut visited = FxHashSet::default();

        while visited.insert(class) {
            if let Some(function) = self.symbol_table.lookup_member(class, member) {
                return CandidateFunction {
                    class_id: class,
                    target: CallTarget::Resolved(function),
                };
            }
            match self.hierarchy.parents(class).first() {
                Some(parent) => class = *parent,
                None => break,
            }
        }

        CandidateFunction {
            class_id: static_class,
            target: CallTarget::Unresolved,
        }
    }

    /// One candidate per descendant of `static_class`, in pre-order.
    ///
    /// A descendant that does not declare `member` reuses the target of its
    /// nearest ancestor on the walk.
    pub fn enumerate_overrides(
        &self,
        static_class: StringId,
        member: StringId,
    ) -> Vec<CandidateFunction> {
        let root = self.resolve_definition(static_class, member);
        self.overrides_below(static_class, member, &root.target)
    }

    fn overrides_below(
        &self,
        static_class: StringId,
        member: StringId,
        inherited: &CallTarget,
    ) -> Vec<CandidateFunction> {
        let mut functions = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_overrides(static_class, member, inherited, &mut functions, &mut visited);
        functions
    }

    fn collect_overrides(
        &self,
        class: StringId,
        member: StringId,
        inherited: &CallTarget,
        functions: &mut Vec<CandidateFunction>,
        visited: &mut FxHashSet<StringId>,
    ) {
        for &child in self.hierarchy.children(class) {
            if !visited.insert(child) {
                continue;
            }

            let target = match self.symbol_table.lookup_member(child, member) {
                Some(function) => CallTarget::Resolved(function),
                None => inherited.clone(),
            };
            functions.push(CandidateFunction {
                class_id: child,
                target: target.clone(),
            });

            self.collect_overrides(child, member, &target, functions, visited);
        }
    }

    /// Every candidate of a virtual call on `static_class`: the overrides in
    /// the subtree, then the definition seen from `static_class` itself when
    /// it resolves.
    pub fn virtual_callsite_targets(
        &self,
        static_class: StringId,
        member: StringId,
    ) -> Vec<CandidateFunction> {
        let root = self.resolve_definition(static_class, member);
        let mut functions = self.overrides_below(static_class, member, &root.target);
        if root.target.is_resolved() {
            functions.push(root);
        }
        functions
    }
}
