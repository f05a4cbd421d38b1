//! Test utilities and fixtures for gotoprog
//!
//! Builders for symbol tables with class hierarchies and for function bodies
//! containing virtual calls, plus one-time logging setup for tests.

pub mod fixtures;
pub mod logging;

pub use fixtures::{called_functions, dispatch_classes, model, ClassTableBuilder, ProgramBuilder};
pub use logging::{capture_logs, init_test_logging};
