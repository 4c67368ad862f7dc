//! The syntax tree produced by the parser. A Tart program is a
//! sequence of expressions, and an expression is either a string
//! literal or a bracketed vector of expressions.

use std::fmt;
use std::fmt::Formatter;

use crate::error::Location;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal string, from either a bare word or a quoted string.
    String { location: Location, value: String },
    /// A bracketed form; by convention the first element names the
    /// callee.
    Vector {
        location: Location,
        elements: Vec<Expr>,
    },
}

impl Expr {
    pub fn location(&self) -> &Location {
        match self {
            Expr::String { location, .. } | Expr::Vector { location, .. } => location,
        }
    }
}

/// The unparser. Bare-representable strings print as bare words;
/// anything else is quoted with the lexer's escape set.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::String { value, .. } => {
                if needs_quotes(value) {
                    write_quoted(f, value)
                } else {
                    f.write_str(value)
                }
            }
            Expr::Vector { elements, .. } => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    element.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.starts_with('#')
        || s.chars()
            .any(|ch| ch.is_whitespace() || matches!(ch, '[' | ']' | '"' | '\\'))
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}
