//! Diagnostics: source locations and the error type that every stage
//! of the pipeline reports through.

use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A (path, line) pair. Created by the driver at file entry, advanced
/// by the lexer on each newline, and cloned into every token and AST
/// node it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: u32,
}

impl Location {
    pub fn new<F: Into<Rc<str>>>(file: F) -> Self {
        Location {
            file: file.into(),
            line: 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, line {}]", self.file, self.line)
    }
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("unterminated string")]
    UnterminatedString,
    #[error("newline in string")]
    NewlineInString,
    #[error("invalid escape character `\\{0}`")]
    InvalidEscape(char),
    #[error("missing `]`")]
    MissingRBracket,
    #[error("stray `]`")]
    StrayRBracket,

    #[error("lambda parameter {0} is not a name")]
    ParamNotName(usize),
    #[error("only the last lambda parameter may end in `...`")]
    VariadicNotLast,

    #[error("attempted procedure call on an empty vector")]
    EmptyCall,
    #[error("expression is not callable")]
    NotCallable,
    #[error("use of undeclared variable `{0}`")]
    UndeclaredVariable(String),
    #[error("redeclaration of variable `{0}`")]
    Redeclaration(String),
    #[error("`{name}` expects {expected}, got {got}")]
    ArityMismatch {
        name: &'static str,
        expected: String,
        got: usize,
    },
    #[error("argument {index} to `{name}` must be a {expected}, not a {found}")]
    ArgumentType {
        name: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("attempted to stringify builtin")]
    StringifyBuiltin,
    #[error("`file` is bound to a {0}, not a string")]
    FileNotString(&'static str),
    #[error("recursion limit exceeded")]
    RecursionLimit,

    #[error("{0}")]
    Io(String),
}

impl ErrorKind {
    pub fn arity_exact(name: &'static str, expected: usize, got: usize) -> ErrorKind {
        ErrorKind::ArityMismatch {
            name,
            expected: format!("exactly {}", count_arguments(expected)),
            got,
        }
    }

    pub fn arity_at_least(name: &'static str, expected: usize, got: usize) -> ErrorKind {
        ErrorKind::ArityMismatch {
            name,
            expected: format!("at least {}", count_arguments(expected)),
            got,
        }
    }
}

fn count_arguments(n: usize) -> String {
    if n == 1 {
        "1 argument".to_owned()
    } else {
        format!("{n} arguments")
    }
}

/// An error kind plus the source location it is reported at. Lexer and
/// parser errors carry their location from birth; evaluation errors
/// pick theirs up from the enclosing call node, and I/O failures at
/// startup have none at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub location: Option<Location>,
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            location: None,
            kind,
        }
    }

    /// Re-locate the error to `location`, dropping any previous one.
    /// Call sites use this to report the outer call rather than the
    /// inner expression that actually failed.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} {}", location, self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl std::error::Error for Error {}
