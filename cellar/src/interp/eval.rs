//! Expression evaluator

use super::env::{Environment, FrameId};
use super::error::{InterpResult, RuntimeError};
use super::pointer::Pointer;
use super::store::{Cell, Store};
use super::value::{Closure, Value};
use crate::ast::Expr;
use crate::config::DEFAULT_MAX_RECURSION_DEPTH;
use std::rc::Rc;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Evaluate `expr` in the global frame of `env`
pub fn evaluate(env: &mut Environment, store: &mut Store, expr: &Expr) -> InterpResult<Value> {
    let global = env.global();
    Evaluator::new(env, store).eval(expr, global)
}

/// Tree-walking evaluator over one environment and one store
pub struct Evaluator<'a> {
    pub(super) env: &'a mut Environment,
    pub(super) store: &'a mut Store,
    /// Current number of nested closure applications
    depth: usize,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(env: &'a mut Environment, store: &'a mut Store) -> Self {
        Evaluator {
            env,
            store,
            depth: 0,
            max_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    pub fn eval(&mut self, expr: &Expr, frame: FrameId) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, frame))
    }

    fn eval_inner(&mut self, expr: &Expr, frame: FrameId) -> InterpResult<Value> {
        match expr {
            Expr::Var(name) => self.env.lookup(frame, name),
            Expr::Num(n) => Ok(Value::Num(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Keyword(k) => Ok(Value::Keyword(*k)),

            Expr::Lambda { param, body } => Ok(Value::Closure(Closure {
                param: param.clone(),
                body: Rc::clone(body),
                env: frame,
            })),

            Expr::App { head, args } => {
                let callee = self.eval(head, frame)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, frame)?);
                }
                match callee {
                    Value::Closure(closure) => self.apply_closure(&closure, values),
                    Value::Prim(prim) => prim.call(&values),
                    other => Err(RuntimeError::invalid_callee(other.type_name())),
                }
            }

            Expr::If {
                guard,
                then_branch,
                else_branch,
            } => match self.eval(guard, frame)? {
                Value::Bool(true) => self.eval(then_branch, frame),
                Value::Bool(false) => self.eval(else_branch, frame),
                other => Err(RuntimeError::type_mismatch(
                    "'if'",
                    "a boolean in guard position",
                    other.type_name(),
                )),
            },

            Expr::New { ty, size } => {
                let ty = match self.eval(ty, frame)? {
                    Value::Keyword(k) => k,
                    other => {
                        return Err(RuntimeError::type_mismatch(
                            "'new'",
                            "a keyword (Num or Bool)",
                            other.type_name(),
                        ));
                    }
                };
                let bounds = self.store.allocate(*size)?;
                self.store.initialize(bounds, Cell::zero(ty));
                tracing::debug!(ty = %ty, low = bounds.low, high = bounds.high, "allocated cells");
                Ok(Value::Pointer(Pointer::to_start(bounds)))
            }

            Expr::Deref(target) => {
                let pointer = self.eval_pointer(target, frame, "'deref'")?;
                let index = pointer.checked_index().map_err(|e| e.in_expr(expr))?;
                self.store.read(index)
            }

            Expr::PointerArith {
                op,
                pointer,
                offset,
            } => {
                // both operands run before either is checked
                let base = self.eval(pointer, frame)?;
                let amount = self.eval(offset, frame)?;
                let (base, amount) = match (base, amount) {
                    (Value::Pointer(p), Value::Num(n)) => (p, n),
                    (Value::Pointer(_), other) => {
                        return Err(RuntimeError::type_mismatch(
                            "'pointer-arith'",
                            "a number as its offset",
                            other.type_name(),
                        ));
                    }
                    (other, _) => {
                        return Err(RuntimeError::type_mismatch(
                            "'pointer-arith'",
                            "a pointer",
                            other.type_name(),
                        ));
                    }
                };
                base.offset(*op, amount, self.store.capacity())
                    .map(Value::Pointer)
                    .map_err(|e| e.in_expr(expr))
            }
        }
    }

    fn eval_pointer(&mut self, expr: &Expr, frame: FrameId, context: &str) -> InterpResult<Pointer> {
        match self.eval(expr, frame)? {
            Value::Pointer(p) => Ok(p),
            other => Err(RuntimeError::type_mismatch(context, "a pointer", other.type_name())),
        }
    }

    /// Run a closure body in a fresh child of its captured frame
    fn apply_closure(&mut self, closure: &Closure, args: Vec<Value>) -> InterpResult<Value> {
        let arg = match <[Value; 1]>::try_from(args) {
            Ok([arg]) => arg,
            Err(args) => return Err(RuntimeError::arity_mismatch("closure", 1, args.len())),
        };
        if self.depth >= self.max_depth {
            return Err(RuntimeError::stack_overflow(self.max_depth));
        }

        tracing::trace!(param = %closure.param, depth = self.depth, "applying closure");
        let mark = self.env.frame_count();
        let frame = self.env.extend1(closure.env, &closure.param, arg);

        self.depth += 1;
        let result = self.eval(&closure.body, frame);
        self.depth -= 1;

        // Only a returned closure can still refer to frames created by this call
        if !matches!(result, Ok(Value::Closure(_))) {
            self.env.release_to(mark);
        }
        result
    }
}
