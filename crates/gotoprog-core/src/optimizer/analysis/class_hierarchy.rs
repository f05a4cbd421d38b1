//! Class hierarchy analysis
//!
//! Builds the parent/child graph over the struct types of a symbol table.
//! Edges are stored as adjacency lists keyed by interned type name, in both
//! directions: `B ∈ parents(A)` iff `A ∈ children(B)`.
//!
//! The hierarchy is a snapshot. It is never updated in place; rebuild it
//! whenever the symbol table's set of types may have changed.

use crate::interner::{StringId, StringInterner};
use crate::symbol_table::SymbolTable;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Direct edges of one class.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Declared bases, in declaration order.
    pub parents: Vec<StringId>,
    pub children: Vec<StringId>,
}

#[derive(Debug, Clone)]
pub struct ClassHierarchy {
    class_map: IndexMap<StringId, ClassEntry, FxBuildHasher>,
    interner: Arc<StringInterner>,
}

impl ClassHierarchy {
    /// An empty hierarchy.
    pub fn new(interner: Arc<StringInterner>) -> Self {
        Self {
            class_map: IndexMap::default(),
            interner,
        }
    }

    /// Build the hierarchy from every struct type declared in `symbol_table`.
    pub fn build(symbol_table: &SymbolTable) -> Self {
        let mut hierarchy = ClassHierarchy::new(symbol_table.interner().clone());

        for symbol in symbol_table.iter() {
            if !symbol_table.is_aggregate_type(symbol.name) {
                continue;
            }
            for parent in symbol_table.base_types(symbol.name) {
                hierarchy.add_edge(parent, symbol.name);
            }
        }

        debug!(
            classes = hierarchy.class_map.len(),
            "built class hierarchy"
        );
        hierarchy
    }

    fn add_edge(&mut self, parent: StringId, child: StringId) {
        self.class_map
            .entry(parent)
            .or_default()
            .children
            .push(child);
        self.class_map.entry(child).or_default().parents.push(parent);
    }

    pub fn len(&self) -> usize {
        self.class_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_map.is_empty()
    }

    /// Whether `class` takes part in any inheritance edge.
    pub fn is_known_class(&self, class: StringId) -> bool {
        self.class_map.contains_key(&class)
    }

    pub fn entry(&self, class: StringId) -> Option<&ClassEntry> {
        self.class_map.get(&class)
    }

    pub fn parents(&self, class: StringId) -> &[StringId] {
        self.class_map
            .get(&class)
            .map(|e| e.parents.as_slice())
            .unwrap_or(&[])
    }

    pub fn children(&self, class: StringId) -> &[StringId] {
        self.class_map
            .get(&class)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// All descendants of `class`: direct children first, then theirs.
    pub fn transitive_children(&self, class: StringId) -> Vec<StringId> {
        let mut result = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(class);
        self.collect_transitive(class, |e| &e.children, &mut result, &mut visited);
        result
    }

    /// All ancestors of `class`: direct parents first, then theirs.
    pub fn transitive_parents(&self, class: StringId) -> Vec<StringId> {
        let mut result = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(class);
        self.collect_transitive(class, |e| &e.parents, &mut result, &mut visited);
        result
    }

    fn collect_transitive(
        &self,
        class: StringId,
        edges: fn(&ClassEntry) -> &Vec<StringId>,
        dest: &mut Vec<StringId>,
        visited: &mut FxHashSet<StringId>,
    ) {
        let Some(entry) = self.class_map.get(&class) else {
            return;
        };

        let fresh: Vec<StringId> = edges(entry)
            .iter()
            .copied()
            .filter(|next| visited.insert(*next))
            .collect();
        dest.extend_from_slice(&fresh);

        for next in fresh {
            self.collect_transitive(next, edges, dest, visited);
        }
    }

    pub fn interner(&self) -> &Arc<StringInterner> {
        &self.interner
    }

    /// Graphviz rendering, edges pointing from child to parent.
    pub fn output_dot(&self) -> String {
        let mut out = String::from(
            "digraph class_hierarchy {\n  rankdir=BT;\n  node [fontsize=12 shape=box];\n",
        );
        for (class, entry) in &self.class_map {
            for parent in &entry.parents {
                out.push_str(&format!(
                    "  \"{}\" -> \"{}\"  [arrowhead=\"vee\"];\n",
                    self.interner.resolve(*class),
                    self.interner.resolve(*parent)
                ));
            }
        }
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for ClassHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (class, entry) in &self.class_map {
            let name = self.interner.resolve(*class);
            for parent in &entry.parents {
                writeln!(f, "Parent of {}: {}", name, self.interner.resolve(*parent))?;
            }
            for child in &entry.children {
                writeln!(f, "Child of {}: {}", name, self.interner.resolve(*child))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::types::{StructType, Type};
    use crate::symbol_table::Symbol;

    fn table_with(classes: &[(&str, &[&str])]) -> SymbolTable {
        let mut table = SymbolTable::new(Arc::new(StringInterner::new()));
        for (name, bases) in classes {
            let id = table.intern(name);
            let bases = bases.iter().map(|b| Type::symbol(table.intern(b))).collect();
            table
                .add(Symbol::new_type(
                    id,
                    Type::Struct(StructType {
                        components: vec![],
                        bases,
                    }),
                ))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_edges_are_symmetric() {
        let table = table_with(&[("A", &[]), ("B", &["A"])]);
        let hierarchy = ClassHierarchy::build(&table);
        let a = table.intern("A");
        let b = table.intern("B");

        assert_eq!(hierarchy.children(a), &[b]);
        assert_eq!(hierarchy.parents(b), &[a]);
        assert!(hierarchy.parents(a).is_empty());
    }

    #[test]
    fn test_transitive_children_order() {
        // A <- B <- D, A <- C
        let table = table_with(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B"])]);
        let hierarchy = ClassHierarchy::build(&table);
        let id = |n: &str| table.intern(n);

        assert_eq!(
            hierarchy.transitive_children(id("A")),
            vec![id("B"), id("C"), id("D")]
        );
        assert_eq!(hierarchy.transitive_parents(id("D")), vec![id("B"), id("A")]);
    }

    #[test]
    fn test_unknown_class_is_empty() {
        let table = table_with(&[("A", &[])]);
        let hierarchy = ClassHierarchy::build(&table);
        let a = table.intern("A");

        // A has no edges, so it never enters the map.
        assert!(!hierarchy.is_known_class(a));
        assert!(hierarchy.transitive_children(a).is_empty());
        assert!(hierarchy.transitive_parents(table.intern("Z")).is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let table = table_with(&[("A", &["B"]), ("B", &["A"])]);
        let hierarchy = ClassHierarchy::build(&table);
        let a = table.intern("A");
        let b = table.intern("B");

        assert_eq!(hierarchy.transitive_children(a), vec![b]);
        assert_eq!(hierarchy.transitive_parents(a), vec![b]);
    }

    #[test]
    fn test_diamond_visits_once() {
        let table = table_with(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]);
        let hierarchy = ClassHierarchy::build(&table);
        let id = |n: &str| table.intern(n);

        assert_eq!(hierarchy.parents(id("D")), &[id("B"), id("C")]);
        assert_eq!(
            hierarchy.transitive_children(id("A")),
            vec![id("B"), id("C"), id("D")]
        );
    }

    #[test]
    fn test_output_formats() {
        let table = table_with(&[("Base", &[]), ("Derived", &["Base"])]);
        let hierarchy = ClassHierarchy::build(&table);

        let text = hierarchy.to_string();
        assert!(text.contains("Parent of Derived: Base"));
        assert!(text.contains("Child of Base: Derived"));

        let dot = hierarchy.output_dot();
        assert!(dot.starts_with("digraph class_hierarchy {"));
        assert!(dot.contains("\"Derived\" -> \"Base\""));
        assert!(dot.ends_with("}\n"));
    }
}
