//! Block/control-flow/declaration evaluation: blocks, `if`/`match`/`for`,
//! calls (shared with the pipe operator via [`apply_in_position`]), and
//! the three declaration forms
//! that populate an environment or the trait registry.

use super::{Evaluator, Flow};
use crate::ast::{Arg, ConstructorDecl, Node, NodeId, Param, Pattern};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::span::Span;
use crate::value::{ConstructorValue, FunctionValue, Value};
use std::sync::Arc;

pub fn eval_block(ev: &mut Evaluator, items: &[Arc<Node>], env: &Env, tail: bool) -> Result<Flow, EvalError> {
    if items.is_empty() {
        return Ok(Flow::Value(Value::Nil));
    }
    let scope = Env::child(env);
    let last = items.len() - 1;
    for (i, item) in items.iter().enumerate() {
        let flow = ev.eval_node(item, &scope, tail && i == last)?;
        if i == last {
            return Ok(flow);
        }
        if !matches!(flow, Flow::Value(_)) {
            return Ok(flow);
        }
    }
    unreachable!("non-empty block always returns through the last-item branch")
}

pub fn eval_if(
    ev: &mut Evaluator,
    cond: &Node,
    then_branch: &Node,
    else_branch: Option<&Node>,
    env: &Env,
    tail: bool,
) -> Result<Flow, EvalError> {
    if ev.eval_expr(cond, env)?.is_truthy() {
        ev.eval_node(then_branch, env, tail)
    } else {
        match else_branch {
            Some(e) => ev.eval_node(e, env, tail),
            None => Ok(Flow::Value(Value::Nil)),
        }
    }
}

pub fn eval_match(ev: &mut Evaluator, scrutinee: &Node, cases: &[(Pattern, Arc<Node>)], env: &Env, tail: bool) -> Result<Flow, EvalError> {
    let value = ev.eval_expr(scrutinee, env)?;
    for (pattern, body) in cases {
        if let Some(bound) = crate::pattern::try_match(pattern, &value, env) {
            return ev.eval_node(body, &bound, tail);
        }
    }
    Err(EvalError::new(ErrorKind::PatternMatchExhausted))
}

pub fn eval_for(ev: &mut Evaluator, binding: &Pattern, iterable: &Node, body: &Node, env: &Env) -> Result<Flow, EvalError> {
    let iter_value = ev.eval_expr(iterable, env)?;
    let items = iterable_items(&iter_value)?;
    for item in items {
        let scope = crate::pattern::try_match(binding, &item, env).ok_or_else(|| EvalError::new(ErrorKind::PatternMatchExhausted))?;
        match ev.eval_node(body, &scope, false)? {
            Flow::Break => break,
            Flow::Continue | Flow::Value(_) => continue,
            other @ (Flow::Return(_) | Flow::TailCall { .. }) => return Ok(other),
        }
    }
    Ok(Flow::Value(Value::Nil))
}

fn iterable_items(v: &Value) -> Result<Vec<Value>, EvalError> {
    match v {
        Value::List(l) => Ok(l.items.iter().collect()),
        Value::Tuple(t) => Ok((**t).clone()),
        Value::Map(m) => Ok(m.0.iter().map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()])).collect()),
        Value::Bytes(b) => Ok(b.data.iter().map(|byte| Value::Int(*byte as i64)).collect()),
        Value::Bits(b) => Ok((0..b.bit_len).filter_map(|i| b.get(i)).map(Value::Bool).collect()),
        other => Err(EvalError::new(ErrorKind::TypeMismatch(format!(
            "cannot iterate over a value of type {}",
            crate::value::type_name(other)
        )))),
    }
}

/// Evaluates the callee and (possibly spread) argument list of a `Call`
/// node, then applies through [`apply_in_position`] so tail calls bounce
/// through the trampoline exactly as a pipe (`|>`) application does.
pub fn eval_call(ev: &mut Evaluator, node_id: NodeId, callee: &Node, args: &[Arg], env: &Env, tail: bool) -> Result<Flow, EvalError> {
    let callee_value = ev.eval_expr(callee, env)?;
    let mut arg_values = Vec::with_capacity(args.len());
    for arg in args {
        if arg.spread {
            match ev.eval_expr(&arg.value, env)? {
                Value::List(list) => arg_values.extend(list.items.iter()),
                Value::Tuple(items) => arg_values.extend(items.iter().cloned()),
                other => {
                    return Err(EvalError::new(ErrorKind::TypeMismatch(format!(
                        "cannot spread a value of type {} into a call",
                        crate::value::type_name(&other)
                    ))))
                }
            }
        } else {
            arg_values.push(ev.eval_expr(&arg.value, env)?);
        }
    }
    // Step 3 of trait dispatch can fall back to the
    // analyzer's node->type map when this call site has no explicit
    // annotation of its own wrapping it.
    match ev.inferred_type(node_id) {
        Some(ty) if ev.expected_type().is_none() => {
            let ty = ty.to_string();
            ev.push_expected_type(ty);
            let result = apply_in_position(ev, callee_value, arg_values, tail);
            ev.pop_expected_type();
            result
        }
        _ => apply_in_position(ev, callee_value, arg_values, tail),
    }
}

/// Applies `callee` to `args`. In tail position this produces
/// `Flow::TailCall` for the trampoline in [`crate::apply::call_function`]
/// to bounce on instead of recursing; otherwise it calls through
/// immediately. Shared between ordinary calls and the `|>` pipe operator
/// so both get identical tail-call behavior.
pub fn apply_in_position(ev: &mut Evaluator, callee: Value, args: Vec<Value>, tail: bool) -> Result<Flow, EvalError> {
    if tail {
        Ok(Flow::TailCall { callee, args })
    } else {
        Ok(Flow::Value(crate::apply::call(ev, &callee, args)?))
    }
}

pub fn eval_function_decl(
    name: &Option<String>,
    params: &[Param],
    return_type: &Option<String>,
    body: &Arc<Node>,
    env: &Env,
    span: Span,
) -> Result<Flow, EvalError> {
    let f = Value::Function(Arc::new(FunctionValue {
        name: name.clone(),
        params: Arc::new(params.to_vec()),
        body: Arc::clone(body),
        captured_env: env.clone(),
        return_type: return_type.clone(),
        span,
    }));
    // Binding the name into the same scope the closure captures is what
    // makes `f` visible to its own body (self- and mutual recursion).
    if let Some(n) = name {
        env.set(n.clone(), f);
    }
    Ok(Flow::Value(Value::Nil))
}

pub fn eval_type_decl(_ev: &mut Evaluator, name: &str, constructors: &[ConstructorDecl], env: &Env) -> Result<Flow, EvalError> {
    for ctor in constructors {
        let value = Value::Constructor(Arc::new(ConstructorValue {
            type_name: Arc::from(name),
            name: Arc::from(ctor.name.as_str()),
            arity: ctor.fields.len(),
        }));
        env.set(ctor.name.clone(), value);
    }
    Ok(Flow::Value(Value::Nil))
}

pub fn eval_trait_decl(ev: &mut Evaluator, name: &str, supertraits: &[String], _methods: &[String]) -> Result<Flow, EvalError> {
    for supertrait in supertraits {
        ev.registry().register_supertrait(name, supertrait);
    }
    Ok(Flow::Value(Value::Nil))
}

pub fn eval_instance_decl(ev: &mut Evaluator, trait_name: &str, type_name: &str, methods: &[(String, Arc<Node>)], env: &Env) -> Result<Flow, EvalError> {
    for (method_name, body) in methods {
        let f = ev.eval_expr(body, env)?;
        ev.registry().register_instance(trait_name, type_name, method_name, f);
    }
    Ok(Flow::Value(Value::Nil))
}

/// Copies bindings made directly in a matched pattern's scope into the
/// caller's scope (used by `PatternAssign`, which binds into the enclosing
/// scope rather than a fresh child one).
pub fn splice_bindings(from: &Env, into: &Env) {
    for (name, value) in from.local_bindings() {
        into.set(name, value);
    }
}
