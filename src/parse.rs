//! Recursive-descent parser over the lazy token stream. The grammar is
//!
//! ```text
//! program     := expression*
//! expression  := STRING | '[' expression* ']'
//! ```

use crate::error::{Error, ErrorKind, Location, Result};
use crate::lex::{Lexer, Token, TokenKind};
use crate::syntax::Expr;

/// Parse a source string into a sequence of top-level expressions.
/// `at` names the file the locations are reported against.
pub fn parse(src: &str, at: Location) -> Result<Vec<Expr>> {
    Parser::new(Lexer::new(src, at))?.program()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// The first token is fetched eagerly.
    fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn program(mut self) -> Result<Vec<Expr>> {
        let mut nodes = Vec::new();
        while !self.current.is_eof() {
            nodes.push(self.expression()?);
        }
        Ok(nodes)
    }

    /// Parse one expression and leave the parser positioned on the
    /// token after it.
    fn expression(&mut self) -> Result<Expr> {
        let location = self.current.location.clone();
        match &self.current.kind {
            TokenKind::Str { value, .. } => {
                let value = value.clone();
                self.advance()?;
                Ok(Expr::String { location, value })
            }
            TokenKind::LBracket => {
                self.advance()?;
                self.vector(location)
            }
            TokenKind::RBracket => Err(Error::new(ErrorKind::StrayRBracket).at(location)),
            TokenKind::Eof => unreachable!("the program and vector loops stop at EOF"),
        }
    }

    /// Elements of a bracketed form, after its `[` has been consumed.
    fn vector(&mut self, location: Location) -> Result<Expr> {
        let mut elements = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::RBracket => {
                    self.advance()?;
                    return Ok(Expr::Vector { location, elements });
                }
                TokenKind::Eof => {
                    return Err(Error::new(ErrorKind::MissingRBracket)
                        .at(self.current.location.clone()));
                }
                _ => elements.push(self.expression()?),
            }
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }
}
