//! Goto-program devirtualization.
//!
//! Builds a class hierarchy from a model's symbol table, lowers virtual
//! calls to explicit dispatch over the runtime class identifier, and prunes
//! functions no longer reachable from the entry point.
//!
//! ```ignore
//! use gotoprog_core::{GotoModel, Optimizer, PassConfig};
//!
//! let mut optimizer = Optimizer::new(PassConfig {
//!     remove_unused_functions: true,
//!     ..PassConfig::default()
//! });
//! optimizer.optimize(&mut model)?;
//! ```

pub mod config;
pub mod errors;
pub mod interner;
pub mod ir;
pub mod optimizer;
pub mod symbol_table;

pub use config::PassConfig;
pub use errors::{ConfigError, ModelError, PassError};
pub use interner::{StringId, StringInterner};
pub use ir::{GotoFunction, GotoFunctions, GotoModel, GotoProgram};
pub use optimizer::analysis::{CallTarget, CandidateFunction, ClassHierarchy, OverrideResolver};
pub use optimizer::{
    remove_unused_functions, remove_virtual_functions, GotoPass, ModelFeatures, Optimizer,
};
pub use symbol_table::{FunctionRef, Symbol, SymbolTable};
