//! Program executor
//!
//! Runs statements in order against the global frame and one store. The run
//! is fail-fast: the first error aborts it and the lines printed so far are
//! dropped with it.

use super::env::{Environment, FrameId};
use super::error::{InterpResult, RuntimeError};
use super::eval::Evaluator;
use super::store::Store;
use super::value::Value;
use crate::ast::{Expr, Program, Stmt};

/// Lines printed by a program, in order
pub type Output = Vec<String>;

/// Execute `program` and return everything it printed
pub fn execute(env: &mut Environment, store: &mut Store, program: &Program) -> InterpResult<Output> {
    Executor::new(env, store).run(program)
}

/// Statement runner layered over an [`Evaluator`]
pub struct Executor<'a> {
    eval: Evaluator<'a>,
}

impl<'a> Executor<'a> {
    pub fn new(env: &'a mut Environment, store: &'a mut Store) -> Self {
        Executor {
            eval: Evaluator::new(env, store),
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Executor {
            eval: self.eval.with_max_depth(max_depth),
        }
    }

    pub fn run(&mut self, program: &Program) -> InterpResult<Output> {
        let mut output = Output::new();
        for stmt in &program.stmts {
            self.exec_stmt(stmt, &mut output)?;
        }
        Ok(output)
    }

    /// Execute one statement, appending anything it prints to `output`
    pub fn exec_stmt(&mut self, stmt: &Stmt, output: &mut Output) -> InterpResult<()> {
        tracing::debug!(%stmt, "executing statement");
        let global = FrameId::GLOBAL;
        match stmt {
            Stmt::Define { name, expr } => {
                let value = self.eval.eval(expr, global)?;
                self.eval.env.define(global, name, value)
            }
            Stmt::Assign { location, expr } => {
                let target = self.eval.eval(location, global)?;
                let value = self.eval.eval(expr, global)?;
                self.assign(location, target, value)
            }
            Stmt::Print(expr) => {
                let value = self.eval.eval(expr, global)?;
                output.push(value.to_string());
                Ok(())
            }
        }
    }

    fn assign(&mut self, location: &Expr, target: Value, value: Value) -> InterpResult<()> {
        match (target, location) {
            (Value::Pointer(pointer), _) => {
                let index = pointer.checked_index()?;
                self.eval.store.write(index, &value)
            }
            (_, Expr::Var(name)) => self.eval.env.assign(FrameId::GLOBAL, name, value),
            _ => Err(RuntimeError::invalid_assign_target(&location.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Keyword;
    use crate::interp::error::ErrorKind;

    fn run(stmts: Vec<Stmt>) -> InterpResult<Output> {
        let mut env = Environment::with_primitives();
        let mut store = Store::new(10);
        execute(&mut env, &mut store, &Program::new(stmts))
    }

    fn define(name: &str, expr: Expr) -> Stmt {
        Stmt::Define {
            name: name.to_string(),
            expr,
        }
    }

    fn assign(location: Expr, expr: Expr) -> Stmt {
        Stmt::Assign { location, expr }
    }

    fn num_cells(size: usize) -> Expr {
        Expr::new_cells(Expr::Keyword(Keyword::Num), size)
    }

    #[test]
    fn test_print_pointer() {
        let out = run(vec![define("x", num_cells(2)), Stmt::Print(Expr::var("x"))]).unwrap();
        assert_eq!(out, vec!["index: 0 low-bound: 0 up-bound: 1"]);
    }

    #[test]
    fn test_assign_through_pointer() {
        let out = run(vec![
            define("x", num_cells(1)),
            assign(Expr::var("x"), Expr::Num(3.0)),
            Stmt::Print(Expr::deref(Expr::var("x"))),
        ])
        .unwrap();
        assert_eq!(out, vec!["3"]);
    }

    #[test]
    fn test_assign_rebinds_variable() {
        let out = run(vec![
            define("n", Expr::Num(1.0)),
            assign(Expr::var("n"), Expr::Bool(true)),
            Stmt::Print(Expr::var("n")),
        ])
        .unwrap();
        assert_eq!(out, vec!["true"]);
    }

    #[test]
    fn test_assign_unbound_variable() {
        let err = run(vec![assign(Expr::var("ghost"), Expr::Num(1.0))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnboundVariable);
    }

    #[test]
    fn test_assign_type_preserving() {
        let err = run(vec![
            define("x", num_cells(1)),
            assign(Expr::var("x"), Expr::Bool(true)),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_assign_pointer_into_cell_rejected() {
        let err = run(vec![
            define("x", num_cells(1)),
            assign(Expr::var("x"), Expr::var("x")),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_assign_invalid_target() {
        let err = run(vec![assign(Expr::Num(5.0), Expr::Num(1.0))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidAssignTarget);
        assert!(err.message.contains("'5'"));

        let err = run(vec![
            define("x", num_cells(1)),
            assign(Expr::deref(Expr::var("x")), Expr::Num(1.0)),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidAssignTarget);
    }

    #[test]
    fn test_assign_through_pointer_expression() {
        let out = run(vec![
            define("x", num_cells(3)),
            assign(
                Expr::pointer_arith(crate::ast::ArithOp::Add, Expr::var("x"), Expr::Num(2.0)),
                Expr::Num(9.0),
            ),
            Stmt::Print(Expr::deref(Expr::pointer_arith(
                crate::ast::ArithOp::Add,
                Expr::var("x"),
                Expr::Num(2.0),
            ))),
            Stmt::Print(Expr::deref(Expr::var("x"))),
        ])
        .unwrap();
        assert_eq!(out, vec!["9", "0"]);
    }

    #[test]
    fn test_redefinition_fails() {
        let err = run(vec![define("x", Expr::Num(1.0)), define("x", Expr::Num(2.0))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
    }

    #[test]
    fn test_define_primitive_name_is_redefinition() {
        let err = run(vec![define("+", Expr::Num(1.0))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
    }

    #[test]
    fn test_failure_discards_output() {
        let result = run(vec![
            Stmt::Print(Expr::Num(1.0)),
            Stmt::Print(Expr::var("missing")),
            Stmt::Print(Expr::Num(2.0)),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_executor_keeps_state_between_statements() {
        let mut env = Environment::with_primitives();
        let mut store = Store::new(10);
        let mut exec = Executor::new(&mut env, &mut store);
        let mut out = Output::new();
        exec.exec_stmt(&define("a", Expr::Num(2.0)), &mut out).unwrap();
        exec.exec_stmt(&Stmt::Print(Expr::var("a")), &mut out).unwrap();
        assert_eq!(out, vec!["2"]);
    }
}
