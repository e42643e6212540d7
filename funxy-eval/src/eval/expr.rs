//! Evaluation of leaf expressions: literals, collection literals,
//! identifiers, member access, and indexing.

use super::Evaluator;
use crate::ast::{Node, NodeKind, Param, StringPart};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::span::Span;
use crate::value::{BytesValue, FunctionValue, RecordValue, Value};
use num_bigint::BigInt;
use std::str::FromStr;
use std::sync::Arc;

pub fn eval_simple_literal(kind: &NodeKind) -> Value {
    match kind {
        NodeKind::IntLit(i) => Value::Int(*i),
        NodeKind::BigIntLit(s) => match BigInt::from_str(s) {
            Ok(b) => Value::BigInt(Arc::new(b)),
            Err(_) => Value::Int(0),
        },
        NodeKind::FloatLit(f) => Value::Float(*f),
        NodeKind::RationalLit(num, den) => {
            Value::Rational(crate::value::RationalValue::new(BigInt::from(*num), BigInt::from(*den)))
        }
        NodeKind::BoolLit(b) => Value::Bool(*b),
        NodeKind::NilLit => Value::Nil,
        NodeKind::CharLit(c) => Value::Char(*c),
        NodeKind::BytesLit(bytes) => Value::Bytes(BytesValue::new(bytes.clone())),
        NodeKind::BitsLit(bits) => Value::Bits(crate::value::BitsValue::from_bools(bits)),
        other => unreachable!("eval_simple_literal called with non-literal node kind {other:?}"),
    }
}

pub fn eval_string_lit(ev: &mut Evaluator, parts: &[StringPart], env: &Env) -> Result<Value, EvalError> {
    let mut out = String::new();
    for part in parts {
        match part {
            StringPart::Literal(s) => out.push_str(s),
            StringPart::Interpolated(node) => {
                let v = ev.eval_expr(node, env)?;
                out.push_str(&v.to_string());
            }
        }
    }
    Ok(Value::string(&out))
}

/// Evaluates the elements of a list/tuple/call-argument position, splicing
/// `Spread` nodes.
fn eval_spreadable(ev: &mut Evaluator, items: &[Arc<Node>], env: &Env) -> Result<Vec<Value>, EvalError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let NodeKind::Spread(inner) = &item.kind {
            let spread = ev.eval_expr(inner, env)?;
            match spread {
                Value::List(list) => out.extend(list.items.iter()),
                Value::Tuple(t) => out.extend(t.iter().cloned()),
                other => {
                    return Err(EvalError::new(ErrorKind::TypeMismatch(format!(
                        "cannot spread a value of type {}",
                        crate::value::type_name(&other)
                    ))))
                }
            }
        } else {
            out.push(ev.eval_expr(item, env)?);
        }
    }
    Ok(out)
}

pub fn eval_list_lit(ev: &mut Evaluator, items: &[Arc<Node>], env: &Env) -> Result<Value, EvalError> {
    Ok(Value::list(eval_spreadable(ev, items, env)?))
}

pub fn eval_tuple_lit(ev: &mut Evaluator, items: &[Arc<Node>], env: &Env) -> Result<Value, EvalError> {
    Ok(Value::tuple(eval_spreadable(ev, items, env)?))
}

pub fn eval_record_lit(ev: &mut Evaluator, fields: &[(String, Arc<Node>)], env: &Env) -> Result<Value, EvalError> {
    let mut out = Vec::with_capacity(fields.len());
    for (name, node) in fields {
        out.push((Arc::from(name.as_str()), ev.eval_expr(node, env)?));
    }
    Ok(Value::Record(RecordValue::new(None, out)))
}

pub fn eval_map_lit(ev: &mut Evaluator, pairs: &[(Arc<Node>, Arc<Node>)], env: &Env) -> Result<Value, EvalError> {
    let mut map = crate::containers::PMap::new();
    for (key_node, value_node) in pairs {
        let key = ev.eval_expr(key_node, env)?;
        let value = ev.eval_expr(value_node, env)?;
        map = map.insert(key, value);
    }
    Ok(Value::Map(Arc::new(crate::value::MapValue(map))))
}

pub fn eval_identifier(name: &str, env: &Env) -> Result<Value, EvalError> {
    env.lookup(name)
        .ok_or_else(|| EvalError::new(ErrorKind::UndefinedIdentifier(name.to_string())))
}

pub fn eval_member(ev: &mut Evaluator, target: &Node, name: &str, env: &Env) -> Result<Value, EvalError> {
    let base = ev.eval_expr(target, env)?;
    match &base {
        Value::Record(r) => r.get(name).cloned().ok_or_else(|| {
            EvalError::new(ErrorKind::MissingField {
                container: crate::value::type_name(&base),
                field: name.to_string(),
            })
        }),
        Value::TypeObject(t) => ev.registry().find_instance_method(&t.name, name).ok_or_else(|| {
            EvalError::new(ErrorKind::MissingField {
                container: t.name.to_string(),
                field: name.to_string(),
            })
        }),
        other => Err(EvalError::new(ErrorKind::MissingField {
            container: crate::value::type_name(other),
            field: name.to_string(),
        })),
    }
}

pub fn eval_index(ev: &mut Evaluator, target: &Node, index: &Node, env: &Env) -> Result<Value, EvalError> {
    let base = ev.eval_expr(target, env)?;
    let idx = ev.eval_expr(index, env)?;
    match &base {
        Value::List(list) => {
            let i = as_index(&idx)?;
            let len = list.items.len();
            let pos = normalize_index(i, len);
            list.items.get(pos).ok_or_else(|| {
                EvalError::new(ErrorKind::OutOfBounds { index: i, length: len })
            })
        }
        Value::Tuple(items) => {
            let i = as_index(&idx)?;
            let len = items.len();
            let pos = normalize_index(i, len);
            items.get(pos).cloned().ok_or_else(|| {
                EvalError::new(ErrorKind::OutOfBounds { index: i, length: len })
            })
        }
        Value::Map(map) => map
            .0
            .get(&idx)
            .cloned()
            .ok_or_else(|| EvalError::new(ErrorKind::MissingKey(idx.to_string()))),
        Value::Bytes(b) => {
            let i = as_index(&idx)?;
            let pos = normalize_index(i, b.len());
            b.data
                .get(pos)
                .map(|byte| Value::Int(*byte as i64))
                .ok_or_else(|| EvalError::new(ErrorKind::OutOfBounds { index: i, length: b.len() }))
        }
        Value::Bits(b) => {
            let i = as_index(&idx)?;
            let pos = normalize_index(i, b.bit_len);
            b.get(pos)
                .map(Value::Bool)
                .ok_or_else(|| EvalError::new(ErrorKind::OutOfBounds { index: i, length: b.bit_len }))
        }
        other => Err(EvalError::new(ErrorKind::TypeMismatch(format!(
            "cannot index into a value of type {}",
            crate::value::type_name(other)
        )))),
    }
}

fn as_index(v: &Value) -> Result<i64, EvalError> {
    match v {
        Value::Int(i) => Ok(*i),
        other => Err(EvalError::new(ErrorKind::TypeMismatch(format!(
            "expected Int index, got {}",
            crate::value::type_name(other)
        )))),
    }
}

/// Negative indices count from the end; out-of-range collapses to a position `get` will reject.
fn normalize_index(i: i64, len: usize) -> usize {
    if i < 0 {
        let from_end = (-i) as usize;
        if from_end > len {
            usize::MAX
        } else {
            len - from_end
        }
    } else {
        i as usize
    }
}

pub fn eval_function_lit(params: &[Param], body: &Arc<Node>, env: &Env, span: Span) -> Value {
    Value::Function(Arc::new(FunctionValue {
        name: None,
        params: Arc::new(params.to_vec()),
        body: Arc::clone(body),
        captured_env: env.clone(),
        return_type: None,
        span,
    }))
}

