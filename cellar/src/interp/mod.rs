//! Interpreter over a bounded cell store
//!
//! `evaluate` and `execute` work on a caller-supplied environment and store.
//! [`Interpreter`] owns one of each for the lifetime of a run (or a REPL
//! session); concurrent runs must each use their own.

mod env;
mod error;
mod eval;
mod exec;
mod pointer;
mod prims;
mod store;
mod value;

pub use env::{Environment, FrameId};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{evaluate, Evaluator};
pub use exec::{execute, Executor, Output};
pub use pointer::Pointer;
pub use store::{Bounds, Cell, Store, DEFAULT_CAPACITY};
pub use value::{Closure, PrimFn, Primitive, Value};

use crate::ast::{Expr, Program, Stmt};
use crate::config::RunConfig;

/// One environment and one store, sized by a [`RunConfig`]
#[derive(Debug)]
pub struct Interpreter {
    env: Environment,
    store: Store,
    max_depth: usize,
}

impl Interpreter {
    /// Create an interpreter with the default configuration
    pub fn new() -> Self {
        Self::with_config(&RunConfig::default())
    }

    pub fn with_config(config: &RunConfig) -> Self {
        Interpreter {
            env: Environment::with_primitives(),
            store: Store::new(config.store_capacity),
            max_depth: config.max_recursion_depth,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Throw away all bindings and cells
    pub fn reset(&mut self) {
        self.env = Environment::with_primitives();
        self.store = Store::new(self.store.capacity());
    }

    /// Run a whole program, fail-fast
    pub fn execute(&mut self, program: &Program) -> InterpResult<Output> {
        Executor::new(&mut self.env, &mut self.store)
            .with_max_depth(self.max_depth)
            .run(program)
    }

    /// Run a single statement (for REPL)
    pub fn execute_stmt(&mut self, stmt: &Stmt) -> InterpResult<Output> {
        let mut output = Output::new();
        Executor::new(&mut self.env, &mut self.store)
            .with_max_depth(self.max_depth)
            .exec_stmt(stmt, &mut output)?;
        Ok(output)
    }

    /// Evaluate a single expression in the global frame (for REPL)
    pub fn evaluate(&mut self, expr: &Expr) -> InterpResult<Value> {
        let global = self.env.global();
        Evaluator::new(&mut self.env, &mut self.store)
            .with_max_depth(self.max_depth)
            .eval(expr, global)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Keyword;

    #[test]
    fn test_interpreter_uses_configured_capacity() {
        let interp = Interpreter::with_config(&RunConfig::default().store_capacity(3));
        assert_eq!(interp.store().capacity(), 3);
    }

    #[test]
    fn test_state_persists_across_calls() {
        let mut interp = Interpreter::new();
        interp
            .execute_stmt(&Stmt::Define {
                name: "p".to_string(),
                expr: Expr::new_cells(Expr::Keyword(Keyword::Bool), 1),
            })
            .unwrap();
        let out = interp.execute_stmt(&Stmt::Print(Expr::deref(Expr::var("p")))).unwrap();
        assert_eq!(out, vec!["false"]);
        assert_eq!(interp.evaluate(&Expr::deref(Expr::var("p"))).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_reset_clears_env_and_store() {
        let mut interp = Interpreter::with_config(&RunConfig::default().store_capacity(4));
        interp
            .execute_stmt(&Stmt::Define {
                name: "p".to_string(),
                expr: Expr::new_cells(Expr::Keyword(Keyword::Num), 2),
            })
            .unwrap();
        interp.reset();
        assert!(!interp.env().contains(FrameId::GLOBAL, "p"));
        assert_eq!(interp.store().free_cells(), 4);
    }

    #[test]
    fn test_configured_recursion_limit() {
        let config = RunConfig::default().max_recursion_depth(5);
        let mut interp = Interpreter::with_config(&config);
        let program = Program::new(vec![
            Stmt::Define {
                name: "spin".to_string(),
                expr: Expr::lambda("x", Expr::app(Expr::var("spin"), vec![Expr::var("x")])),
            },
            Stmt::Print(Expr::app(Expr::var("spin"), vec![Expr::Num(0.0)])),
        ]);
        let err = interp.execute(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackOverflow);
    }
}
