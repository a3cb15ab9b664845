//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(CompileError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    fn atom(s: &str) -> Token {
        Token::Atom(s.to_string())
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_statement() {
        assert_eq!(
            kinds("(define x 1)"),
            vec![Token::LParen, atom("define"), atom("x"), atom("1"), Token::RParen]
        );
    }

    #[test]
    fn test_tokenize_operator_atoms() {
        assert_eq!(
            kinds("(pointer-arith + p -2.5)"),
            vec![
                Token::LParen,
                atom("pointer-arith"),
                atom("+"),
                atom("p"),
                atom("-2.5"),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_tokenize_parens_split_atoms() {
        assert_eq!(kinds("a(b)c"), vec![atom("a"), Token::LParen, atom("b"), Token::RParen, atom("c")]);
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(kinds("; a comment\n(print x) ; trailing"), kinds("(print x)"));
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("(new Num 2)").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 1));
        assert_eq!(tokens[1].1, Span::new(1, 4));
        assert_eq!(tokens[2].1, Span::new(5, 8));
        assert_eq!(tokens[4].1, Span::new(10, 11));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::LParen.to_string(), "(");
        assert_eq!(atom("deref").to_string(), "deref");
    }
}
