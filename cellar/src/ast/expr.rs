//! Expression AST nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Expression
///
/// Produced once by the translator and never mutated. Lambda bodies sit
/// behind an `Rc` so closures can share them without copying the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Variable reference
    Var(String),
    /// Number literal
    Num(f64),
    /// Boolean literal
    Bool(bool),
    /// Type keyword literal (`Num` or `Bool`)
    Keyword(Keyword),

    /// Single-parameter function: (lambda param body)
    Lambda { param: String, body: Rc<Expr> },

    /// Application: (head arg...)
    App { head: Box<Expr>, args: Vec<Expr> },

    /// Conditional: (if guard then else)
    If {
        guard: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Store allocation: (new ty size)
    New { ty: Box<Expr>, size: usize },

    /// Pointer dereference: (deref target)
    Deref(Box<Expr>),

    /// Pointer arithmetic: (pointer-arith op pointer offset)
    PointerArith {
        op: ArithOp,
        pointer: Box<Expr>,
        offset: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn lambda(param: impl Into<String>, body: Expr) -> Self {
        Expr::Lambda {
            param: param.into(),
            body: Rc::new(body),
        }
    }

    pub fn app(head: Expr, args: Vec<Expr>) -> Self {
        Expr::App {
            head: Box::new(head),
            args,
        }
    }

    pub fn if_(guard: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Expr::If {
            guard: Box::new(guard),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn new_cells(ty: Expr, size: usize) -> Self {
        Expr::New {
            ty: Box::new(ty),
            size,
        }
    }

    pub fn deref(target: Expr) -> Self {
        Expr::Deref(Box::new(target))
    }

    pub fn pointer_arith(op: ArithOp, pointer: Expr, offset: Expr) -> Self {
        Expr::PointerArith {
            op,
            pointer: Box::new(pointer),
            offset: Box::new(offset),
        }
    }
}

/// Type keywords accepted by `new`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyword {
    Num,
    Bool,
}

impl Keyword {
    pub fn name(self) -> &'static str {
        match self {
            Keyword::Num => "Num",
            Keyword::Bool => "Bool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Num" => Some(Keyword::Num),
            "Bool" => Some(Keyword::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operators permitted in pointer arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    /// Apply the operator to plain numbers (no element-size scaling)
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithOp::Add => lhs + rhs,
            ArithOp::Sub => lhs - rhs,
            ArithOp::Mul => lhs * rhs,
            ArithOp::Div => lhs / rhs,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Keyword(k) => write!(f, "{k}"),
            Expr::Lambda { param, body } => write!(f, "(lambda {param} {body})"),
            Expr::App { head, args } => {
                write!(f, "({head}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            Expr::If {
                guard,
                then_branch,
                else_branch,
            } => write!(f, "(if {guard} {then_branch} {else_branch})"),
            Expr::New { ty, size } => write!(f, "(new {ty} {size})"),
            Expr::Deref(target) => write!(f, "(deref {target})"),
            Expr::PointerArith {
                op,
                pointer,
                offset,
            } => write!(f, "(pointer-arith {op} {pointer} {offset})"),
        }
    }
}
