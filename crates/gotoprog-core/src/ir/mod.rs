//! The goto-program IR: types, expressions, instructions, function bodies
//! and the function table.

pub mod class_identifier;
pub mod expr;
pub mod format;
pub mod functions;
pub mod instruction;
pub mod model;
pub mod program;
pub mod source_location;
pub mod types;

pub use expr::Expression;
pub use functions::{GotoFunction, GotoFunctions, ENTRY_POINT};
pub use instruction::{FunctionCall, Instruction, InstructionId, InstructionKind};
pub use model::GotoModel;
pub use program::GotoProgram;
pub use source_location::SourceLocation;
pub use types::{CodeType, Component, StructType, Type};
