//! Runtime errors for the interpreter

use crate::ast::Expr;
use thiserror::Error;

/// Runtime error during evaluation or execution
///
/// Every error aborts the whole `evaluate`/`execute` call; there is no local
/// recovery and no partial result.
#[derive(Debug, Clone, Error)]
#[error("Runtime error: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Variable not bound in any frame of the chain
    UnboundVariable,
    /// Name already bound in the current frame
    Redefinition,
    /// Closure applied to anything but exactly one argument, or primitive misuse
    ArityMismatch,
    /// Wrong value kind for a guard, operand, or type-preserving write
    TypeMismatch,
    /// Application head is neither a closure nor a primitive
    InvalidCallee,
    /// Assignment target is neither a pointer nor a bare variable
    InvalidAssignTarget,
    /// Pointer index outside its allocation bounds or the store range
    OutOfBounds,
    /// Dereference of an uninitialized cell
    UninitializedRead,
    /// Write through a pointer into an uninitialized cell
    UninitializedWrite,
    /// Candidate run would extend past the last cell of the store
    CapacityExceeded,
    /// No uninitialized cell left anywhere
    StoreFull,
    /// Pointer-arithmetic operator outside `+ - * /`
    UnknownOperator,
    /// Division by zero in the `/` primitive
    DivisionByZero,
    /// Allocation of zero cells
    InvalidAllocationSize,
    /// Closure applications nested deeper than the configured limit
    StackOverflow,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError { kind, message }
    }

    pub fn unbound_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::UnboundVariable,
            format!("unbound variable '{name}'"),
        )
    }

    pub fn redefinition(name: &str) -> Self {
        Self::new(
            ErrorKind::Redefinition,
            format!("redefinition of variable '{name}'"),
        )
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("{name} expects {expected} argument(s) but {got} were given"),
        )
    }

    pub fn type_mismatch(context: &str, expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("{context} expects {expected} but a {got} was given"),
        )
    }

    pub fn non_integer_index(raw: f64) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("pointer arithmetic produced the non-integer index {raw}"),
        )
    }

    pub fn invalid_callee(got: &str) -> Self {
        Self::new(
            ErrorKind::InvalidCallee,
            format!("expected closure or primitive, but found '{got}'"),
        )
    }

    pub fn invalid_assign_target(location: &str) -> Self {
        Self::new(
            ErrorKind::InvalidAssignTarget,
            format!("cannot assign to non-location '{location}'"),
        )
    }

    pub fn out_of_bounds(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfBounds, detail.into())
    }

    pub fn uninitialized_read(index: usize) -> Self {
        Self::new(
            ErrorKind::UninitializedRead,
            format!("accessed memory at {index} is uninitialized"),
        )
    }

    pub fn uninitialized_write(index: usize) -> Self {
        Self::new(
            ErrorKind::UninitializedWrite,
            format!("attempting to assign data to unallocated index {index}"),
        )
    }

    pub fn capacity_exceeded(size: usize) -> Self {
        Self::new(
            ErrorKind::CapacityExceeded,
            format!("no run of {size} free cell(s) is available in memory"),
        )
    }

    pub fn store_full() -> Self {
        Self::new(ErrorKind::StoreFull, "pointer memory is full".to_string())
    }

    pub fn unknown_operator(op: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("'pointer-arith' expects one of + - * / but '{op}' was given"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }

    pub fn invalid_allocation_size(size: usize) -> Self {
        Self::new(
            ErrorKind::InvalidAllocationSize,
            format!("cannot allocate {size} cell(s)"),
        )
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: more than {limit} nested calls"),
        )
    }

    /// Name the expression that raised the error
    pub fn in_expr(mut self, expr: &Expr) -> Self {
        self.message = format!("{}: {expr}", self.message);
        self
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
