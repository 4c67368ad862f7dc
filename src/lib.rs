//! Tart is a procedural markup language: a document is a sequence of
//! expressions whose string results are concatenated with
//! whitespace-aware separation. Plain text mixes with Lisp-style
//! procedure calls `[proc arg arg ...]`, so authors can define their
//! own markup constructs right in the document.

mod error;
pub use error::*;

mod lex;
pub use lex::*;

mod syntax;
pub use syntax::*;

mod parse;
pub use parse::*;

mod value;
pub use value::*;

mod env;
pub use env::*;

mod eval;
pub use eval::{apply, evaluate};

mod builtin;
pub use builtin::default_env;

mod run;
pub use run::*;
