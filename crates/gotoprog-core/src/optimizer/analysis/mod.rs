//! Analyses over the symbol and function tables.

pub mod call_graph;
pub mod class_hierarchy;
pub mod override_resolver;

pub use call_graph::CallGraph;
pub use class_hierarchy::{ClassEntry, ClassHierarchy};
pub use override_resolver::{CallTarget, CandidateFunction, OverrideResolver};
