//! The builtin procedures installed into the root environment. Every
//! builtin receives its argument nodes unevaluated plus the calling
//! environment; argument counts are checked before types, and type
//! errors cite the 1-based argument index.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;

use crate::env::Env;
use crate::error::{Error, ErrorKind, Result};
use crate::eval::{apply, evaluate, CallDepth};
use crate::run::run_file;
use crate::syntax::Expr;
use crate::value::{assemble, Builtin, BuiltinFn, Lambda, Value};

const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("let", builtin_let),
    ("set", builtin_set),
    ("get", builtin_get),
    ("string", builtin_string),
    ("vector", builtin_vector),
    ("lambda", builtin_lambda),
    ("print", builtin_print),
    ("cat", builtin_cat),
    ("join", builtin_join),
    ("map", builtin_map),
    ("run", builtin_run),
];

/// The root environment: every builtin under its name. The driver adds
/// the `file` binding when it enters a source file.
pub fn default_env() -> Env {
    let mut env = Env::new();
    for &(name, func) in BUILTINS {
        env.bind(name, Value::Builtin(Builtin { name, func }));
    }
    env
}

fn builtin_let(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    expect_exact("let", args, 2)?;
    let name = expect_string("let", 1, evaluate(&args[0], env)?)?;
    let value = evaluate(&args[1], env)?;
    env.borrow_mut().define(&name, value).map_err(Error::new)?;
    Ok(Value::string(""))
}

fn builtin_set(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    expect_exact("set", args, 2)?;
    let name = expect_string("set", 1, evaluate(&args[0], env)?)?;
    let value = evaluate(&args[1], env)?;
    env.borrow_mut().assign(&name, value).map_err(Error::new)?;
    Ok(Value::string(""))
}

fn builtin_get(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    expect_exact("get", args, 1)?;
    let name = expect_string("get", 1, evaluate(&args[0], env)?)?;
    let found = env.borrow().lookup(&name);
    found.ok_or_else(|| Error::new(ErrorKind::UndeclaredVariable(name)))
}

/// Whitespace-aware join of the stringified arguments.
fn builtin_string(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    let values = eval_args(args, env)?;
    let mut parts = Vec::with_capacity(values.len());
    for value in &values {
        parts.push(value.to_text().map_err(Error::new)?);
    }
    Ok(Value::String(assemble(parts)))
}

fn builtin_vector(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    Ok(Value::Vector(eval_args(args, env)?))
}

/// `[lambda [params] body...]`. The only builtin that leaves its
/// arguments unevaluated: the parameter vector and the body are kept
/// as syntax, and the current environment is captured.
fn builtin_lambda(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::new(ErrorKind::arity_at_least("lambda", 1, 0)));
    }
    let Expr::Vector { elements, .. } = &args[0] else {
        return Err(Error::new(ErrorKind::ArgumentType {
            name: "lambda",
            index: 1,
            expected: "parameter vector",
            found: "string",
        }));
    };

    let mut params = Vec::with_capacity(elements.len());
    let mut rest = None;
    for (i, element) in elements.iter().enumerate() {
        let Expr::String { value, .. } = element else {
            return Err(Error::new(ErrorKind::ParamNotName(i + 1)));
        };
        match value.strip_suffix("...") {
            Some(name) if i + 1 == elements.len() => rest = Some(name.to_owned()),
            Some(_) => return Err(Error::new(ErrorKind::VariadicNotLast)),
            None => params.push(value.clone()),
        }
    }

    Ok(Value::Lambda(Rc::new(Lambda {
        params,
        rest,
        body: args[1..].to_vec(),
        env: Rc::clone(env),
    })))
}

/// Debugging output: plain space separation and a trailing newline,
/// unlike the whitespace-aware rule of `string`.
fn builtin_print(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    let values = eval_args(args, env)?;
    let mut parts = Vec::with_capacity(values.len());
    for value in &values {
        let text = value.to_text().map_err(Error::new)?;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    println!("{}", parts.join(" "));
    Ok(Value::string(""))
}

/// Concatenate strings or vectors; the arguments must all share one of
/// those two types.
fn builtin_cat(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    let values = eval_args(args, env)?;
    let Some(first) = values.first() else {
        return Ok(Value::string(""));
    };

    match first {
        Value::String(_) => {
            let mut out = String::new();
            for (i, value) in values.iter().enumerate() {
                match value {
                    Value::String(s) => out.push_str(s),
                    other => return Err(cat_mismatch(i, "string", other)),
                }
            }
            Ok(Value::String(out))
        }
        Value::Vector(_) => {
            let mut out = Vec::new();
            for (i, value) in values.iter().enumerate() {
                match value {
                    Value::Vector(elements) => out.extend_from_slice(elements),
                    other => return Err(cat_mismatch(i, "vector", other)),
                }
            }
            Ok(Value::Vector(out))
        }
        other => Err(cat_mismatch(0, "string or vector", other)),
    }
}

fn cat_mismatch(index: usize, expected: &'static str, found: &Value) -> Error {
    Error::new(ErrorKind::ArgumentType {
        name: "cat",
        index: index + 1,
        expected,
        found: found.type_name(),
    })
}

fn builtin_join(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    expect_exact("join", args, 2)?;
    let separator = expect_string("join", 1, evaluate(&args[0], env)?)?;
    let elements = expect_vector("join", 2, evaluate(&args[1], env)?)?;
    let mut parts = Vec::with_capacity(elements.len());
    for element in &elements {
        parts.push(element.to_text().map_err(Error::new)?);
    }
    Ok(Value::String(parts.join(&separator)))
}

fn builtin_map(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    expect_exact("map", args, 2)?;
    let lambda = expect_lambda("map", 1, evaluate(&args[0], env)?)?;
    let elements = expect_vector("map", 2, evaluate(&args[1], env)?)?;
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        out.push(apply(&lambda, vec![element])?);
    }
    Ok(Value::Vector(out))
}

/// Execute another document against the current environment. Bindings
/// it introduces persist; its own output is discarded. The `file`
/// binding names the included document for its duration and is
/// restored afterwards, error or not.
fn builtin_run(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    expect_exact("run", args, 1)?;
    let path = expect_string("run", 1, evaluate(&args[0], env)?)?;
    let _depth = CallDepth::enter()?;

    let current = match env.borrow().lookup("file") {
        Some(Value::String(file)) => file,
        Some(other) => return Err(Error::new(ErrorKind::FileNotString(other.type_name()))),
        None => return Err(Error::new(ErrorKind::UndeclaredVariable("file".to_owned()))),
    };
    let target = Path::new(&current)
        .parent()
        .map(|dir| dir.join(&path))
        .unwrap_or_else(|| PathBuf::from(&path));

    debug!("including {}", target.display());
    let result = run_file(&target, env);
    Env::globals(env)
        .borrow_mut()
        .bind("file", Value::String(current));
    result?;
    Ok(Value::string(""))
}

fn eval_args(args: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(evaluate(arg, env)?);
    }
    Ok(values)
}

fn expect_exact(name: &'static str, args: &[Expr], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::new(ErrorKind::arity_exact(name, expected, args.len())));
    }
    Ok(())
}

fn expect_string(name: &'static str, index: usize, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(argument_type(name, index, "string", &other)),
    }
}

fn expect_vector(name: &'static str, index: usize, value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Vector(elements) => Ok(elements),
        other => Err(argument_type(name, index, "vector", &other)),
    }
}

fn expect_lambda(name: &'static str, index: usize, value: Value) -> Result<Rc<Lambda>> {
    match value {
        Value::Lambda(lambda) => Ok(lambda),
        other => Err(argument_type(name, index, "lambda", &other)),
    }
}

fn argument_type(
    name: &'static str,
    index: usize,
    expected: &'static str,
    found: &Value,
) -> Error {
    Error::new(ErrorKind::ArgumentType {
        name,
        index,
        expected,
        found: found.type_name(),
    })
}
