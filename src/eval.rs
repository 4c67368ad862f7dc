//! The tree-walking evaluator. `evaluate` turns an expression into a
//! value against an environment; `apply` invokes a lambda. Bracketed
//! calls dispatch on the callee: builtins receive their argument nodes
//! unevaluated, lambdas receive evaluated values.

use std::cell::{Cell, RefCell};
use std::env;
use std::iter::zip;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::env::Env;
use crate::error::{Error, ErrorKind, Result};
use crate::syntax::Expr;
use crate::value::{Lambda, Value};

pub fn evaluate(node: &Expr, env: &Rc<RefCell<Env>>) -> Result<Value> {
    match node {
        Expr::String { value, .. } => Ok(Value::String(value.clone())),
        // Any error escaping a call is re-located to the call node, so
        // the diagnostic names the outermost call site.
        Expr::Vector { location, elements } => {
            call(elements, env).map_err(|e| e.at(location.clone()))
        }
    }
}

fn call(elements: &[Expr], env: &Rc<RefCell<Env>>) -> Result<Value> {
    let Some((head, args)) = elements.split_first() else {
        return Err(Error::new(ErrorKind::EmptyCall));
    };

    // A string head is a name; anything else is used as the callee
    // directly, e.g. [[lambda [] hi]].
    let callee = match evaluate(head, env)? {
        Value::String(name) => {
            let found = env.borrow().lookup(&name);
            found.ok_or_else(|| Error::new(ErrorKind::UndeclaredVariable(name)))?
        }
        other => other,
    };

    match callee {
        Value::Builtin(builtin) => (builtin.func)(args, env),
        Value::Lambda(lambda) => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, env)?);
            }
            apply(&lambda, values)
        }
        _ => Err(Error::new(ErrorKind::NotCallable)),
    }
}

/// Invoke a lambda on already-evaluated arguments: bind parameters in
/// a fresh scope under the captured environment and evaluate the body
/// in order. An empty body yields the empty string.
pub fn apply(lambda: &Lambda, mut args: Vec<Value>) -> Result<Value> {
    let _depth = CallDepth::enter()?;

    if lambda.is_variadic() {
        if args.len() < lambda.params.len() {
            return Err(Error::new(ErrorKind::arity_at_least(
                "lambda",
                lambda.params.len(),
                args.len(),
            )));
        }
    } else if args.len() != lambda.params.len() {
        return Err(Error::new(ErrorKind::arity_exact(
            "lambda",
            lambda.params.len(),
            args.len(),
        )));
    }

    let rest = if lambda.is_variadic() {
        args.split_off(lambda.params.len())
    } else {
        Vec::new()
    };

    let mut scope = Env::with_outer(Rc::clone(&lambda.env));
    for (name, value) in zip(&lambda.params, args) {
        scope.define(name, value).map_err(Error::new)?;
    }
    if let Some(rest_name) = &lambda.rest {
        scope.define(rest_name, Value::Vector(rest)).map_err(Error::new)?;
    }

    let scope = Rc::new(RefCell::new(scope));
    let mut result = Value::string("");
    for node in &lambda.body {
        result = evaluate(node, &scope)?;
    }
    Ok(result)
}

const DEFAULT_RECURSION_LIMIT: usize = 200;

fn recursion_limit() -> usize {
    static LIMIT: OnceLock<usize> = OnceLock::new();
    *LIMIT.get_or_init(|| {
        env::var("TART_RECURSION_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RECURSION_LIMIT)
    })
}

thread_local! {
    static CALL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Guard counting dynamic call depth. Entered once per lambda
/// application and once per `run` inclusion; fails instead of letting
/// runaway recursion overflow the native stack.
pub(crate) struct CallDepth;

impl CallDepth {
    pub(crate) fn enter() -> Result<CallDepth> {
        CALL_DEPTH.with(|depth| {
            if depth.get() >= recursion_limit() {
                return Err(Error::new(ErrorKind::RecursionLimit));
            }
            depth.set(depth.get() + 1);
            Ok(CallDepth)
        })
    }
}

impl Drop for CallDepth {
    fn drop(&mut self) {
        CALL_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}
