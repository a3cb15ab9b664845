//! Runtime values for the interpreter

use super::env::FrameId;
use super::error::InterpResult;
use super::pointer::Pointer;
use crate::ast::{Expr, Keyword};
use std::fmt;
use std::rc::Rc;

/// Native function backing a primitive
pub type PrimFn = fn(&[Value]) -> InterpResult<Value>;

/// Runtime value
///
/// Values are immutable. Rebinding a variable or overwriting a cell replaces
/// the value, it never mutates one in place.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit floating point number
    Num(f64),
    /// Boolean
    Bool(bool),
    /// Lambda closed over the frame it was evaluated in
    Closure(Closure),
    /// Native operator
    Prim(Primitive),
    /// Bounds-checked pointer into the store
    Pointer(Pointer),
    /// Type keyword (`Num` / `Bool`)
    Keyword(Keyword),
}

/// A lambda together with its defining frame
#[derive(Debug, Clone)]
pub struct Closure {
    pub param: String,
    pub body: Rc<Expr>,
    /// Captured by reference: later rebinding in that frame stays visible
    pub env: FrameId,
}

/// A named native function
#[derive(Clone, Copy)]
pub struct Primitive {
    pub name: &'static str,
    pub func: PrimFn,
}

impl Primitive {
    pub fn call(&self, args: &[Value]) -> InterpResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive({})", self.name)
    }
}

impl Value {
    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Closure(_) => "closure",
            Value::Prim(_) => "primitive",
            Value::Pointer(_) => "pointer",
            Value::Keyword(_) => "keyword",
        }
    }
}

/// Print a number the way programs see it: `-0` as `0`, infinities spelled out
pub(super) fn write_num(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n == 0.0 {
        write!(f, "0")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write_num(f, *n),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Closure(_) => write!(f, "<closure>"),
            Value::Prim(p) => write!(f, "<prim {}>", p.name),
            Value::Pointer(p) => write!(f, "{p}"),
            Value::Keyword(k) => write!(f, "{k}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => {
                a.param == b.param && a.env == b.env && Rc::ptr_eq(&a.body, &b.body)
            }
            (Value::Prim(a), Value::Prim(b)) => a.name == b.name,
            (Value::Pointer(a), Value::Pointer(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            _ => false,
        }
    }
}
