//! The call convention: parameter binding against
//! required/default/variadic/ignored parameters, arity checking, partial
//! application, constructor application, and the tail-call trampoline.
//!
//! Tail calls never grow the host stack: a function body that evaluates to
//! `Flow::TailCall` in tail position bounces back through the loop in
//! [`call`] instead of recursing, regardless of whether the tail target is
//! the same function (self-recursion) or a different one (mutual
//! recursion) — an iterative trampoline, not limited to self-calls.

use crate::ast::Param;
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::eval::{Evaluator, Flow};
use crate::value::{
    BoundMethodValue, ConstructorValue, DataInstanceValue, FunctionValue, PartialApplicationValue,
    Value,
};
use std::sync::Arc;

/// Calls that recurse through [`call`] rather than bouncing through the
/// trampoline (a non-tail call into a function value, a composed function's
/// inner application, ...) are capped so a runaway non-tail recursion fails
/// loudly instead of blowing the host stack.
const MAX_CALL_DEPTH: usize = 4096;

pub fn call(ev: &mut Evaluator, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    if ev.call_depth() > MAX_CALL_DEPTH {
        return Err(EvalError::new(ErrorKind::User(
            "call stack depth exceeded".to_string(),
        )));
    }
    match callee {
        Value::Function(f) => {
            let required = required_count(&f.params);
            match partial_application(callee, required, args)? {
                Ok(partial) => Ok(partial),
                Err(args) => call_function(ev, Arc::clone(f), args),
            }
        }
        Value::Builtin(b) => match partial_application(callee, b.min_arity, args)? {
            Ok(partial) => Ok(partial),
            Err(args) => call_builtin(ev, b, args),
        },
        Value::Constructor(c) => call_constructor(c, args),
        Value::ClassMethod(c) => call_class_method(ev, c, args),
        Value::BoundMethod(b) => call_bound_method(ev, b, args),
        Value::OperatorFunction(op) => call_operator(ev, op, args),
        Value::ComposedFunction(c) => call_composed(ev, c, args),
        Value::PartialApplication(p) => call_partial(ev, p, args),
        other => Err(EvalError::new(ErrorKind::NotCallable(crate::value::type_name(other)))),
    }
}

/// The trampoline proper. Loops on tail calls to functions (and delegates a
/// tail call to anything else back through [`call`], which is the one case
/// that still grows the host stack — acceptable since the common hot loop
/// is self- or mutually-recursive function tail calls).
fn call_function(ev: &mut Evaluator, mut f: Arc<FunctionValue>, mut args: Vec<Value>) -> Result<Value, EvalError> {
    loop {
        let env = bind_params(ev, &f.params, args, &f.captured_env)?;
        ev.push_frame(f.name.clone().unwrap_or_else(|| "<anonymous>".to_string()), f.span);
        let flow = ev.eval_body(&f.body, &env);
        ev.pop_frame();
        match flow? {
            Flow::TailCall { callee, args: next_args } => match callee {
                Value::Function(next_f) => {
                    f = next_f;
                    args = next_args;
                    continue;
                }
                other => return call(ev, &other, next_args),
            },
            Flow::Return(v) | Flow::Value(v) => return Ok(v),
            Flow::Break | Flow::Continue => {
                return Err(EvalError::new(ErrorKind::User(
                    "break/continue outside a loop".to_string(),
                )))
            }
        }
    }
}

/// Required (non-defaulted, non-variadic) parameter count — the threshold
/// below which [`call`] produces a `PartialApplication` rather than binding.
fn required_count(params: &[Param]) -> usize {
    let has_variadic = params.iter().any(|p| p.variadic);
    let fixed_count = if has_variadic { params.len() - 1 } else { params.len() };
    params.iter().take(fixed_count).filter(|p| p.default.is_none()).count()
}

/// Fewer than `required` arguments produces a `PartialApplication`
/// retaining the applied args (an empty argument list is an arity error
/// instead, not an always-partial no-op). Returns `Ok(Ok(partial))` when
/// under-applied, `Ok(Err(args))` to hand the untouched args back to the
/// caller for a full call.
fn partial_application(callee: &Value, required: usize, args: Vec<Value>) -> Result<Result<Value, Vec<Value>>, EvalError> {
    if args.len() >= required {
        return Ok(Err(args));
    }
    if args.is_empty() {
        return Err(EvalError::new(ErrorKind::ArityMismatch {
            expected: format!("at least {required} argument(s)"),
            got: 0,
        }));
    }
    let remaining = required - args.len();
    Ok(Ok(Value::PartialApplication(Arc::new(PartialApplicationValue {
        callable: Arc::new(callee.clone()),
        applied: Arc::new(args),
        remaining,
    }))))
}

fn bind_params(ev: &mut Evaluator, params: &[Param], args: Vec<Value>, parent: &Env) -> Result<Env, EvalError> {
    let has_variadic = params.iter().any(|p| p.variadic);

    if !has_variadic && args.len() > params.len() {
        return Err(EvalError::new(ErrorKind::ArityMismatch {
            expected: describe_arity(params),
            got: args.len(),
        }));
    }

    let env = Env::child(parent);
    let mut args_iter = args.into_iter();
    for p in params {
        if p.variadic {
            let rest: Vec<Value> = args_iter.by_ref().collect();
            if !p.ignored {
                env.set(p.name.clone(), Value::list(rest));
            }
            break;
        }
        let value = match args_iter.next() {
            Some(v) => v,
            None => {
                let default = p
                    .default
                    .as_ref()
                    .expect("arity check guarantees a default exists here");
                ev.eval_expr(default, &env)?
            }
        };
        if !p.ignored {
            env.set(p.name.clone(), value);
        }
    }
    Ok(env)
}

fn describe_arity(params: &[Param]) -> String {
    let required = params.iter().filter(|p| !p.variadic && p.default.is_none()).count();
    if params.iter().any(|p| p.variadic) {
        format!("at least {required} argument(s)")
    } else if params.iter().any(|p| p.default.is_some()) {
        format!("{required} to {} argument(s)", params.len())
    } else {
        format!("{required} argument(s)")
    }
}

fn call_builtin(ev: &mut Evaluator, b: &Arc<crate::value::BuiltinValue>, args: Vec<Value>) -> Result<Value, EvalError> {
    if args.len() < b.min_arity || (!b.variadic && args.len() > b.min_arity + b.defaults.len()) {
        return Err(EvalError::new(ErrorKind::ArityMismatch {
            expected: format!("{} argument(s)", b.min_arity),
            got: args.len(),
        }));
    }
    let mut args = args;
    if !b.variadic {
        let missing = (b.min_arity + b.defaults.len()).saturating_sub(args.len());
        let supplied_defaults = b.defaults.len().saturating_sub(missing.min(b.defaults.len()));
        args.extend(b.defaults.iter().skip(supplied_defaults).cloned());
    }
    (b.func)(ev, args)
}

fn call_constructor(c: &Arc<ConstructorValue>, args: Vec<Value>) -> Result<Value, EvalError> {
    if args.len() > c.arity {
        return Err(EvalError::new(ErrorKind::ArityMismatch {
            expected: format!("{} argument(s)", c.arity),
            got: args.len(),
        }));
    }
    if args.len() == c.arity {
        Ok(Value::DataInstance(DataInstanceValue::new(
            c.type_name.clone(),
            c.name.clone(),
            args,
        )))
    } else {
        let remaining = c.arity - args.len();
        Ok(Value::PartialApplication(Arc::new(PartialApplicationValue {
            callable: Arc::new(Value::Constructor(Arc::clone(c))),
            applied: Arc::new(args),
            remaining,
        })))
    }
}

fn call_class_method(ev: &mut Evaluator, c: &Arc<crate::value::ClassMethodValue>, args: Vec<Value>) -> Result<Value, EvalError> {
    let ctx = crate::dispatch::DispatchContext {
        args: &args,
        container_context: ev.container_context(),
        expected_type: ev.expected_type(),
    };
    let method = ev
        .registry()
        .resolve(&c.trait_name, &c.method, &ctx)
        .ok_or_else(|| {
            let dispatch_type = args
                .first()
                .map(crate::value::type_name)
                .unwrap_or_else(|| "<no argument>".to_string());
            EvalError::new(ErrorKind::TraitInstanceMissing {
                trait_name: c.trait_name.to_string(),
                method: c.method.to_string(),
                dispatch_type,
            })
        })?;
    call(ev, &method, args)
}

fn call_bound_method(ev: &mut Evaluator, b: &Arc<BoundMethodValue>, args: Vec<Value>) -> Result<Value, EvalError> {
    let mut full_args = Vec::with_capacity(args.len() + 1);
    full_args.push((*b.receiver).clone());
    full_args.extend(args);
    call(ev, &b.function, full_args)
}

fn call_operator(ev: &mut Evaluator, op: &Arc<str>, args: Vec<Value>) -> Result<Value, EvalError> {
    let trait_name = ev.registry().operator_trait(op).ok_or_else(|| {
        EvalError::new(ErrorKind::NotCallable(format!("operator `{op}`")))
    })?;
    let ctx = crate::dispatch::DispatchContext {
        args: &args,
        container_context: ev.container_context(),
        expected_type: ev.expected_type(),
    };
    let method = ev.registry().resolve(&trait_name, op, &ctx).ok_or_else(|| {
        let dispatch_type = args
            .first()
            .map(crate::value::type_name)
            .unwrap_or_else(|| "<no argument>".to_string());
        EvalError::new(ErrorKind::TraitInstanceMissing {
            trait_name: trait_name.clone(),
            method: op.to_string(),
            dispatch_type,
        })
    })?;
    call(ev, &method, args)
}

/// `f ,, g` applies `g` first, then feeds its result to `f`.
fn call_composed(ev: &mut Evaluator, c: &Arc<crate::value::ComposedFunctionValue>, args: Vec<Value>) -> Result<Value, EvalError> {
    let inner = call(ev, &c.g, args)?;
    call(ev, &c.f, vec![inner])
}

fn call_partial(ev: &mut Evaluator, p: &Arc<PartialApplicationValue>, args: Vec<Value>) -> Result<Value, EvalError> {
    let mut full_args: Vec<Value> = (*p.applied).clone();
    full_args.extend(args);
    call(ev, &p.callable, full_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Arg, Node, NodeKind, Param};
    use crate::span::Span;

    fn span() -> Span {
        Span::new(0, 0, 0, 0, 0, 0)
    }

    fn node(kind: NodeKind) -> Arc<Node> {
        Arc::new(Node { id: 0, span: span(), kind })
    }

    fn ident(name: &str) -> Arc<Node> {
        node(NodeKind::Identifier(name.to_string()))
    }

    fn int(n: i64) -> Arc<Node> {
        node(NodeKind::IntLit(n))
    }

    fn param(name: &str) -> Param {
        Param { name: name.to_string(), default: None, variadic: false, ignored: false }
    }

    fn call_node(callee: Arc<Node>, args: Vec<Arc<Node>>) -> Arc<Node> {
        node(NodeKind::Call {
            callee,
            args: args.into_iter().map(|value| Arg { value, spread: false }).collect(),
        })
    }

    fn function(name: &str, params: Vec<&str>, body: Arc<Node>, env: &Env) -> Value {
        Value::Function(Arc::new(FunctionValue {
            name: Some(name.to_string()),
            params: Arc::new(params.iter().map(|p| param(p)).collect()),
            body,
            captured_env: env.clone(),
            return_type: None,
            span: span(),
        }))
    }

    /// A self-recursive function doing N tail calls uses O(1) host stack:
    /// `loop(n) = if n == 0 then 0 else loop(n - 1)` driven to a depth far
    /// beyond `MAX_CALL_DEPTH` must not error or overflow, because each
    /// step bounces through the trampoline instead of recursing through
    /// [`call`].
    #[test]
    fn self_recursive_tail_call_does_not_grow_host_stack() {
        let root = Env::root();
        let body = node(NodeKind::If {
            cond: node(NodeKind::Infix { op: "==".to_string(), left: ident("n"), right: int(0) }),
            then_branch: int(0),
            else_branch: Some(call_node(
                ident("loop"),
                vec![node(NodeKind::Infix { op: "-".to_string(), left: ident("n"), right: int(1) })],
            )),
        });
        let f = function("loop", vec!["n"], body, &root);
        root.set("loop", f.clone());

        let mut ev = Evaluator::new();
        let result = call(&mut ev, &f, vec![Value::Int(1_000_000)]).expect("trampoline should not overflow");
        assert_eq!(result, Value::Int(0));
    }

    /// `(f applied a) applied b == f(a,b)` for binary `f`.
    #[test]
    fn partial_application_law_holds_for_binary_function() {
        let root = Env::root();
        let body = node(NodeKind::Infix { op: "-".to_string(), left: ident("a"), right: ident("b") });
        let f = function("sub", vec!["a", "b"], body, &root);

        let mut ev = Evaluator::new();
        let direct = call(&mut ev, &f, vec![Value::Int(10), Value::Int(3)]).unwrap();

        let partial = call(&mut ev, &f, vec![Value::Int(10)]).unwrap();
        assert!(matches!(partial, Value::PartialApplication(_)));
        let completed = call(&mut ev, &partial, vec![Value::Int(3)]).unwrap();

        assert_eq!(direct, completed);
        assert_eq!(direct, Value::Int(7));
    }

    #[test]
    fn zero_args_against_multi_param_function_is_an_arity_error() {
        let root = Env::root();
        let body = int(0);
        let f = function("f", vec!["a", "b"], body, &root);
        let mut ev = Evaluator::new();
        let err = call(&mut ev, &f, vec![]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ArityMismatch { .. }));
    }

    #[test]
    fn defaults_fill_from_defining_scope() {
        let root = Env::root();
        root.set("d", Value::Int(42));
        let f = Value::Function(Arc::new(FunctionValue {
            name: Some("withDefault".to_string()),
            params: Arc::new(vec![Param {
                name: "x".to_string(),
                default: Some(ident("d")),
                variadic: false,
                ignored: false,
            }]),
            body: ident("x"),
            captured_env: root.clone(),
            return_type: None,
            span: span(),
        }));
        let mut ev = Evaluator::new();
        let result = call(&mut ev, &f, vec![]).unwrap();
        assert_eq!(result, Value::Int(42));
    }
}
