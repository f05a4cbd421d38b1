pub mod unused_function_elimination;

pub use unused_function_elimination::{
    prune, remove_unused_functions, UnusedFunctionEliminationPass, UnusedFunctionStats,
};
