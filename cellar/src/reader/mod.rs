//! S-expression reader
//!
//! Groups the token stream into atoms and parenthesized lists. Nesting is
//! tracked with an explicit stack, so deeply nested input cannot exhaust
//! the native stack here.

use crate::ast::Span;
use crate::error::{CompileError, Result};
use crate::lexer::{tokenize, Token};
use std::fmt;

/// A read but not yet translated form
#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    Atom { value: String, span: Span },
    List { items: Vec<Sexp>, span: Span },
}

impl Sexp {
    pub fn span(&self) -> Span {
        match self {
            Sexp::Atom { span, .. } | Sexp::List { span, .. } => *span,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Sexp::Atom { value, .. } => Some(value),
            Sexp::List { .. } => None,
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Atom { value, .. } => write!(f, "{value}"),
            Sexp::List { items, .. } => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Read every top-level form from a token stream
pub fn read(tokens: &[(Token, Span)]) -> Result<Vec<Sexp>> {
    let mut forms = Vec::new();
    // open lists: span of the '(' and the items read so far
    let mut open: Vec<(Span, Vec<Sexp>)> = Vec::new();

    for (token, span) in tokens {
        let form = match token {
            Token::LParen => {
                open.push((*span, Vec::new()));
                continue;
            }
            Token::RParen => {
                let (start, items) = open
                    .pop()
                    .ok_or_else(|| CompileError::parser("unexpected ')'", *span))?;
                Sexp::List {
                    items,
                    span: start.merge(*span),
                }
            }
            Token::Atom(value) => Sexp::Atom {
                value: value.clone(),
                span: *span,
            },
        };
        match open.last_mut() {
            Some((_, items)) => items.push(form),
            None => forms.push(form),
        }
    }

    if let Some((start, _)) = open.last() {
        return Err(CompileError::parser("unclosed '('", *start));
    }
    Ok(forms)
}

/// Tokenize and read source text
pub fn read_str(source: &str) -> Result<Vec<Sexp>> {
    let tokens = tokenize(source)?;
    read(&tokens)
}
