//! Token definitions

use logos::Logos;
use std::fmt;

/// S-expression token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
#[logos(skip r";[^\n]*")]
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    /// Any run of characters that is not whitespace, a parenthesis, or `;`
    #[regex(r"[^\s();]+", |lex| lex.slice().to_string())]
    Atom(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Atom(s) => write!(f, "{s}"),
        }
    }
}
