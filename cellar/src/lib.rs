//! Cellar interpreter library
//!
//! A small expression language whose only mutable state is a bounded store
//! of typed cells, reached through bounds-checked pointers.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod reader;
pub mod repl;
pub mod translator;

pub use ast::Span;
pub use error::{CompileError, Result};
