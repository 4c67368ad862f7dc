//! The driver: load a source file, parse it, evaluate the top-level
//! expressions against an environment, and assemble their strings into
//! the document output. Both the CLI entry point and the `run` builtin
//! go through here.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::env::Env;
use crate::error::{Error, ErrorKind, Location, Result};
use crate::eval::evaluate;
use crate::parse::parse;
use crate::value::{assemble, Value};

/// Execute the document at `path` against `env` and return its
/// assembled output. The path is canonicalized and bound as `file` in
/// the root environment for the duration of the evaluation; callers
/// that need the previous `file` restore it themselves.
pub fn run_file(path: &Path, env: &Rc<RefCell<Env>>) -> Result<String> {
    let path = path.canonicalize().map_err(|e| {
        Error::new(ErrorKind::Io(format!("cannot open `{}`: {e}", path.display())))
    })?;
    let src = fs::read_to_string(&path).map_err(|e| {
        Error::new(ErrorKind::Io(format!("cannot read `{}`: {e}", path.display())))
    })?;

    let name = path.to_string_lossy();
    debug!("running {name}");
    Env::globals(env)
        .borrow_mut()
        .bind("file", Value::string(name.as_ref()));

    let program = parse(&src, Location::new(name.as_ref()))?;
    let mut parts = Vec::with_capacity(program.len());
    for node in &program {
        let value = evaluate(node, env)?;
        let text = value
            .to_text()
            .map_err(|kind| Error::new(kind).at(node.location().clone()))?;
        parts.push(text);
    }
    Ok(assemble(parts))
}
