//! Translation from s-expressions to the AST
//!
//! Special forms are recognized by their head atom. Everything else in
//! head position becomes an application, so arity of calls is left to the
//! evaluator.

use crate::ast::{ArithOp, Expr, Keyword, Program, Span, Stmt};
use crate::error::{CompileError, Result};
use crate::interp::RuntimeError;
use crate::reader::{read_str, Sexp};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Lex, read and translate a whole program
pub fn parse_program(source: &str) -> Result<Program> {
    let forms = read_str(source)?;
    translate_program(&forms)
}

/// Lex, read and translate a single expression
pub fn parse_expr(source: &str) -> Result<Expr> {
    let forms = read_str(source)?;
    match forms.as_slice() {
        [form] => translate_expr(form),
        [] => Err(CompileError::parser("expected an expression", Span::new(0, 0))),
        [_, extra, ..] => Err(CompileError::parser(
            "expected a single expression",
            extra.span(),
        )),
    }
}

pub fn translate_program(forms: &[Sexp]) -> Result<Program> {
    let stmts = forms.iter().map(translate_stmt).collect::<Result<Vec<_>>>()?;
    Ok(Program::new(stmts))
}

/// Returns true when the form is headed by a statement keyword
pub fn is_statement(form: &Sexp) -> bool {
    matches!(head_atom(form), Some("define" | "assign" | "print"))
}

pub fn translate_stmt(form: &Sexp) -> Result<Stmt> {
    let Sexp::List { items, span } = form else {
        return Err(CompileError::parser(
            format!("expected a statement but found '{form}'"),
            form.span(),
        ));
    };

    match head_atom(form) {
        Some("define") => {
            let [_, name, expr] = expect_form::<3>("define", items, *span)?;
            Ok(Stmt::Define {
                name: binder(name, "define")?,
                expr: translate_expr(expr)?,
            })
        }
        Some("assign") => {
            let [_, location, expr] = expect_form::<3>("assign", items, *span)?;
            Ok(Stmt::Assign {
                location: translate_expr(location)?,
                expr: translate_expr(expr)?,
            })
        }
        Some("print") => {
            let [_, expr] = expect_form::<2>("print", items, *span)?;
            Ok(Stmt::Print(translate_expr(expr)?))
        }
        _ => Err(CompileError::parser(
            format!("expected 'define', 'assign' or 'print' but found '{form}'"),
            *span,
        )),
    }
}

pub fn translate_expr(form: &Sexp) -> Result<Expr> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || translate_inner(form))
}

fn translate_inner(form: &Sexp) -> Result<Expr> {
    let (items, span) = match form {
        Sexp::Atom { value, .. } => return Ok(translate_atom(value)),
        Sexp::List { items, span } => (items, *span),
    };

    match head_atom(form) {
        Some("lambda") => {
            let [_, param, body] = expect_form::<3>("lambda", items, span)?;
            Ok(Expr::lambda(binder(param, "lambda")?, translate_expr(body)?))
        }
        Some("if") => {
            let [_, guard, then_branch, else_branch] = expect_form::<4>("if", items, span)?;
            Ok(Expr::if_(
                translate_expr(guard)?,
                translate_expr(then_branch)?,
                translate_expr(else_branch)?,
            ))
        }
        Some("new") => {
            let [_, ty, size] = expect_form::<3>("new", items, span)?;
            Ok(Expr::new_cells(translate_expr(ty)?, allocation_size(size)?))
        }
        Some("deref") => {
            let [_, target] = expect_form::<2>("deref", items, span)?;
            Ok(Expr::deref(translate_expr(target)?))
        }
        Some("pointer-arith") => {
            let [_, op, pointer, offset] = expect_form::<4>("pointer-arith", items, span)?;
            let symbol = op.as_atom().unwrap_or_default();
            let op = ArithOp::from_symbol(symbol).ok_or_else(|| {
                let err = RuntimeError::unknown_operator(&op.to_string());
                CompileError::parser(err.message, op.span())
            })?;
            Ok(Expr::pointer_arith(
                op,
                translate_expr(pointer)?,
                translate_expr(offset)?,
            ))
        }
        Some(kw @ ("define" | "assign" | "print")) => Err(CompileError::parser(
            format!("'{kw}' is a statement and cannot be used as an expression"),
            span,
        )),
        _ => {
            let Some((head, args)) = items.split_first() else {
                return Err(CompileError::parser("empty application '()'", span));
            };
            let args = args.iter().map(translate_expr).collect::<Result<Vec<_>>>()?;
            Ok(Expr::app(translate_expr(head)?, args))
        }
    }
}

fn translate_atom(atom: &str) -> Expr {
    match atom {
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        _ => {
            if let Some(keyword) = Keyword::from_name(atom) {
                Expr::Keyword(keyword)
            } else if let Some(n) = number_literal(atom) {
                Expr::Num(n)
            } else {
                Expr::var(atom)
            }
        }
    }
}

/// Parse a numeric atom: optional `-`, digits, optional fraction
///
/// Words that `f64::from_str` would also accept (`inf`, `NaN`, `1e5`) stay
/// variables.
fn number_literal(atom: &str) -> Option<f64> {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let valid = match frac {
        None => !int.is_empty() && all_digits(int),
        Some(frac) => (!int.is_empty() || !frac.is_empty()) && all_digits(int) && all_digits(frac),
    };
    if valid && digits != "." {
        atom.parse().ok()
    } else {
        None
    }
}

fn allocation_size(form: &Sexp) -> Result<usize> {
    let size = form
        .as_atom()
        .and_then(number_literal)
        .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= usize::MAX as f64);
    match size {
        Some(n) => Ok(n as usize),
        None => Err(CompileError::parser(
            format!("'new' expects a positive integer size but '{form}' was given"),
            form.span(),
        )),
    }
}

/// Names bound by `define` and `lambda` must be plain identifiers
fn binder(form: &Sexp, context: &str) -> Result<String> {
    match form {
        Sexp::Atom { value, .. } if matches!(translate_atom(value), Expr::Var(_)) => {
            Ok(value.clone())
        }
        _ => Err(CompileError::parser(
            format!("'{context}' expects a variable name but '{form}' was given"),
            form.span(),
        )),
    }
}

fn head_atom(form: &Sexp) -> Option<&str> {
    match form {
        Sexp::List { items, .. } => items.first().and_then(Sexp::as_atom),
        Sexp::Atom { .. } => None,
    }
}

fn expect_form<'a, const N: usize>(
    name: &str,
    items: &'a [Sexp],
    span: Span,
) -> Result<&'a [Sexp; N]> {
    items.try_into().map_err(|_| {
        CompileError::parser(
            format!(
                "'{name}' expects {} operand(s) but {} were given",
                N - 1,
                items.len().saturating_sub(1)
            ),
            span,
        )
    })
}
