//! The runtime value universe: strings, vectors, user lambdas, and
//! builtin procedures, plus stringification and the whitespace-aware
//! assembly rule shared by `string` and the top-level emitter.

use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

use crate::env::Env;
use crate::error::{ErrorKind, Result};
use crate::syntax::Expr;

/// A builtin receives its argument nodes *unevaluated*, together with
/// the environment of the call site. Builtins control their own
/// argument evaluation; `lambda` depends on that.
pub type BuiltinFn = fn(&[Expr], &Rc<RefCell<Env>>) -> Result<Value>;

#[derive(Debug, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

/// A user-defined procedure together with the environment captured at
/// its creation. `rest` is the variadic parameter, its `...` suffix
/// already stripped.
pub struct Lambda {
    pub params: Vec<String>,
    pub rest: Option<String>,
    pub body: Vec<Expr>,
    pub env: Rc<RefCell<Env>>,
}

impl Lambda {
    pub fn is_variadic(&self) -> bool {
        self.rest.is_some()
    }
}

// The captured environment routinely contains the lambda itself, so
// the derived impl would recurse forever.
impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("params", &self.params)
            .field("rest", &self.rest)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Vector(Vec<Value>),
    Lambda(Rc<Lambda>),
    Builtin(Builtin),
}

impl Value {
    /// Construct a string value.
    pub fn string<S: Into<String>>(s: S) -> Value {
        Value::String(s.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Vector(_) => "vector",
            Value::Lambda(_) => "lambda",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Stringify a value. Vectors drop empty elements and join the
    /// rest with single spaces; lambdas render through the unparser
    /// (a diagnostic form, not a canonical one); builtins refuse.
    pub fn to_text(&self) -> std::result::Result<String, ErrorKind> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Vector(elements) => {
                let mut parts = Vec::with_capacity(elements.len());
                for element in elements {
                    let text = element.to_text()?;
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
                Ok(parts.join(" "))
            }
            Value::Lambda(lambda) => {
                let mut params = lambda.params.clone();
                if let Some(rest) = &lambda.rest {
                    params.push(format!("{rest}..."));
                }
                let mut out = format!("[lambda [{}]", params.join(" "));
                for node in &lambda.body {
                    out.push(' ');
                    out.push_str(&node.to_string());
                }
                out.push(']');
                Ok(out)
            }
            Value::Builtin(_) => Err(ErrorKind::StringifyBuiltin),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            // Lambdas compare by identity; their environments are
            // cyclic and structural comparison would not terminate.
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

/// Combine already-stringified pieces, dropping empties and inserting
/// a single ASCII space at each boundary unless one side already has
/// whitespace there. Explicit `"\n"` or `"\t"` pieces therefore
/// control layout without double-spacing.
pub fn assemble<I>(pieces: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::new();
    for piece in pieces {
        if piece.is_empty() {
            continue;
        }
        if !out.is_empty()
            && !out.ends_with(char::is_whitespace)
            && !piece.starts_with(char::is_whitespace)
        {
            out.push(' ');
        }
        out.push_str(&piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Location;
    use crate::parse::parse;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    #[test]
    fn assemble_separates_words_with_one_space() {
        assert_eq!(assemble(strings(&["hello", "world"])), "hello world");
        assert_eq!(assemble(strings(&["a", "b", "c"])), "a b c");
    }

    #[test]
    fn assemble_drops_empty_pieces() {
        assert_eq!(assemble(strings(&["", "hello", "", "world", ""])), "hello world");
        assert_eq!(assemble(strings(&[])), "");
        assert_eq!(assemble(strings(&["", ""])), "");
    }

    #[test]
    fn assemble_respects_existing_whitespace() {
        assert_eq!(assemble(strings(&["title", "\n", "body"])), "title\nbody");
        assert_eq!(assemble(strings(&["a ", "b"])), "a b");
        assert_eq!(assemble(strings(&["a", " b"])), "a b");
        assert_eq!(assemble(strings(&["a\t", "\tb"])), "a\t\tb");
    }

    #[test]
    fn strings_stringify_to_themselves() {
        assert_eq!(Value::string("blah").to_text().unwrap(), "blah");
        assert_eq!(Value::string("").to_text().unwrap(), "");
    }

    #[test]
    fn vectors_stringify_space_joined_without_empties() {
        let v = Value::Vector(vec![
            Value::string("a"),
            Value::string(""),
            Value::Vector(vec![Value::string("b"), Value::string("c")]),
        ]);
        assert_eq!(v.to_text().unwrap(), "a b c");
        assert_eq!(Value::Vector(Vec::new()).to_text().unwrap(), "");
    }

    #[test]
    fn lambdas_stringify_to_a_lambda_form() {
        let body = parse("[string hello [get who]]", Location::new("test.tart")).unwrap();
        let lambda = Value::Lambda(Rc::new(Lambda {
            params: vec!["who".to_owned()],
            rest: Some("rest".to_owned()),
            body,
            env: Rc::new(RefCell::new(Env::new())),
        }));
        // The exact text is diagnostic, not canonical; check the shape.
        let text = lambda.to_text().unwrap();
        assert!(text.starts_with("[lambda [who rest...]"));
        assert!(text.ends_with("]"));
    }

    #[test]
    fn builtins_refuse_to_stringify() {
        fn nop(_: &[Expr], _: &Rc<RefCell<Env>>) -> Result<Value> {
            Ok(Value::string(""))
        }
        let b = Value::Builtin(Builtin {
            name: "nop",
            func: nop,
        });
        assert_eq!(b.to_text().unwrap_err(), ErrorKind::StringifyBuiltin);

        // Even one buried in a vector.
        let v = Value::Vector(vec![Value::string("x"), b]);
        assert_eq!(v.to_text().unwrap_err(), ErrorKind::StringifyBuiltin);
    }
}
