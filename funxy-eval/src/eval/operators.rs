//! Operator semantics: numeric promotion across
//! `Int -> BigInt -> Rational -> Float`, short-circuit `&&`/`||`, the `??`
//! null-coalesce over `Optional`, `|>` pipe, `,,` composition, and the
//! trait-dispatched `<>`/`>>=`/`<*>` operators.

use super::{Evaluator, Flow};
use crate::ast::Node;
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::{ClassMethodValue, ComposedFunctionValue, NumericRank, RationalValue, Value};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::sync::Arc;

pub fn eval_prefix(ev: &mut Evaluator, op: &str, operand: &Node, env: &Env) -> Result<Value, EvalError> {
    let v = ev.eval_expr(operand, env)?;
    match op {
        "-" => negate(&v),
        "!" => Ok(Value::Bool(!v.is_truthy())),
        other => Err(EvalError::new(ErrorKind::NotCallable(format!("prefix operator `{other}`")))),
    }
}

pub fn eval_postfix(ev: &mut Evaluator, op: &str, operand: &Node, env: &Env) -> Result<Value, EvalError> {
    let v = ev.eval_expr(operand, env)?;
    match op {
        // `t?` unwraps an `Optional`-shaped value, propagating emptiness by
        // returning it unchanged rather than erroring.
        "?" => {
            let method = Value::ClassMethod(Arc::new(ClassMethodValue {
                trait_name: Arc::from("Empty"),
                method: Arc::from("isEmpty"),
                arity: 1,
            }));
            let is_empty = crate::apply::call(ev, &method, vec![v.clone()])?;
            if is_empty.is_truthy() {
                Ok(v)
            } else {
                let unwrap = Value::ClassMethod(Arc::new(ClassMethodValue {
                    trait_name: Arc::from("Optional"),
                    method: Arc::from("unwrap"),
                    arity: 1,
                }));
                crate::apply::call(ev, &unwrap, vec![v])
            }
        }
        other => Err(EvalError::new(ErrorKind::NotCallable(format!("postfix operator `{other}`")))),
    }
}

pub fn eval_infix(ev: &mut Evaluator, op: &str, left: &Node, right: &Node, env: &Env, tail: bool) -> Result<Flow, EvalError> {
    match op {
        "&&" => {
            let l = ev.eval_expr(left, env)?;
            if !l.is_truthy() {
                return Ok(Flow::Value(Value::Bool(false)));
            }
            Ok(Flow::Value(Value::Bool(ev.eval_expr(right, env)?.is_truthy())))
        }
        "||" => {
            let l = ev.eval_expr(left, env)?;
            if l.is_truthy() {
                return Ok(Flow::Value(Value::Bool(true)));
            }
            Ok(Flow::Value(Value::Bool(ev.eval_expr(right, env)?.is_truthy())))
        }
        // `a ?? b`: evaluate `a`; if `a.isEmpty()` evaluate `b`, else
        // `a.unwrap()`. No `Optional` instance for `a`'s type → `a`
        // unchanged.
        "??" => {
            let l = ev.eval_expr(left, env)?;
            let is_empty = Value::ClassMethod(Arc::new(ClassMethodValue {
                trait_name: Arc::from("Empty"),
                method: Arc::from("isEmpty"),
                arity: 1,
            }));
            match crate::apply::call(ev, &is_empty, vec![l.clone()]) {
                Ok(empty) if empty.is_truthy() => Ok(Flow::Value(ev.eval_expr(right, env)?)),
                Ok(_) => {
                    let unwrap = Value::ClassMethod(Arc::new(ClassMethodValue {
                        trait_name: Arc::from("Optional"),
                        method: Arc::from("unwrap"),
                        arity: 1,
                    }));
                    Ok(Flow::Value(crate::apply::call(ev, &unwrap, vec![l])?))
                }
                Err(_) => Ok(Flow::Value(l)),
            }
        }
        "|>" => {
            let arg = ev.eval_expr(left, env)?;
            let callee = ev.eval_expr(right, env)?;
            super::stmt::apply_in_position(ev, callee, vec![arg], tail)
        }
        // `f $ x` is `f(x)`.
        "$" => {
            let callee = ev.eval_expr(left, env)?;
            let arg = ev.eval_expr(right, env)?;
            super::stmt::apply_in_position(ev, callee, vec![arg], tail)
        }
        ",," => {
            let f = ev.eval_expr(left, env)?;
            let g = ev.eval_expr(right, env)?;
            Ok(Flow::Value(Value::ComposedFunction(Arc::new(ComposedFunctionValue { f: Arc::new(f), g: Arc::new(g) }))))
        }
        "==" => Ok(Flow::Value(Value::Bool(ev.eval_expr(left, env)? == ev.eval_expr(right, env)?))),
        "!=" => Ok(Flow::Value(Value::Bool(ev.eval_expr(left, env)? != ev.eval_expr(right, env)?))),
        "<" | "<=" | ">" | ">=" => {
            let l = ev.eval_expr(left, env)?;
            let r = ev.eval_expr(right, env)?;
            Ok(Flow::Value(Value::Bool(compare(&l, &r, op)?)))
        }
        "<>" => dispatch_operator(ev, "Semigroup", "<>", left, right, env),
        ">>=" => dispatch_operator(ev, "Monad", ">>=", left, right, env),
        "<*>" => dispatch_operator(ev, "Applicative", "<*>", left, right, env),
        "+" | "-" | "*" | "/" | "%" | "**" => {
            let l = ev.eval_expr(left, env)?;
            let r = ev.eval_expr(right, env)?;
            Ok(Flow::Value(arithmetic(op, &l, &r)?))
        }
        other => Err(EvalError::new(ErrorKind::NotCallable(format!("infix operator `{other}`")))),
    }
}

fn dispatch_operator(ev: &mut Evaluator, trait_name: &str, method: &str, left: &Node, right: &Node, env: &Env) -> Result<Flow, EvalError> {
    let l = ev.eval_expr(left, env)?;
    let r = ev.eval_expr(right, env)?;
    let type_name = crate::value::type_name(&l);
    ev.push_container_context(type_name);
    let result = {
        let callee = Value::ClassMethod(Arc::new(ClassMethodValue {
            trait_name: Arc::from(trait_name),
            method: Arc::from(method),
            arity: 2,
        }));
        crate::apply::call(ev, &callee, vec![l, r])
    };
    ev.pop_container_context();
    Ok(Flow::Value(result?))
}

fn negate(v: &Value) -> Result<Value, EvalError> {
    match v {
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .or_else(|| Some(Value::BigInt(Arc::new(-BigInt::from(*i)))))
            .ok_or_else(|| EvalError::new(ErrorKind::NumericOverflow("negation".to_string()))),
        Value::BigInt(b) => Ok(Value::BigInt(Arc::new(-(**b).clone()))),
        Value::Float(f) => Ok(Value::Float(-f)),
        Value::Rational(r) => Ok(Value::Rational(RationalValue::new(-(*r.num).clone(), (*r.den).clone()))),
        other => Err(EvalError::new(ErrorKind::TypeMismatch(format!(
            "cannot negate a value of type {}",
            crate::value::type_name(other)
        )))),
    }
}

fn rank_of(v: &Value) -> Option<NumericRank> {
    match v {
        Value::Int(_) => Some(NumericRank::Int),
        Value::BigInt(_) => Some(NumericRank::BigInt),
        Value::Rational(_) => Some(NumericRank::Rational),
        Value::Float(_) => Some(NumericRank::Float),
        _ => None,
    }
}

fn as_bigint(v: &Value) -> BigInt {
    match v {
        Value::Int(i) => BigInt::from(*i),
        Value::BigInt(b) => (**b).clone(),
        _ => unreachable!("as_bigint called on a non-integral value"),
    }
}

fn as_rational(v: &Value) -> RationalValue {
    match v {
        Value::Int(i) => RationalValue::from_bigint(BigInt::from(*i)),
        Value::BigInt(b) => RationalValue::from_bigint((**b).clone()),
        Value::Rational(r) => r.clone(),
        _ => unreachable!("as_rational called on a non-exact-numeric value"),
    }
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(i) => *i as f64,
        Value::BigInt(b) => b.to_f64().unwrap_or(f64::NAN),
        Value::Rational(r) => r.to_f64(),
        Value::Float(f) => *f,
        _ => f64::NAN,
    }
}

fn arithmetic(op: &str, l: &Value, r: &Value) -> Result<Value, EvalError> {
    let (Some(lr), Some(rr)) = (rank_of(l), rank_of(r)) else {
        return Err(EvalError::new(ErrorKind::TypeMismatch(format!(
            "cannot apply `{op}` to {} and {}",
            crate::value::type_name(l),
            crate::value::type_name(r)
        ))));
    };
    let rank = lr.max(rr);
    match rank {
        NumericRank::Int => {
            let (a, b) = (as_i64(l), as_i64(r));
            int_arithmetic(op, a, b)
        }
        NumericRank::BigInt => {
            let (a, b) = (as_bigint(l), as_bigint(r));
            bigint_arithmetic(op, a, b)
        }
        NumericRank::Rational => {
            let (a, b) = (as_rational(l), as_rational(r));
            rational_arithmetic(op, a, b)
        }
        NumericRank::Float => {
            let (a, b) = (as_f64(l), as_f64(r));
            float_arithmetic(op, a, b)
        }
    }
}

fn as_i64(v: &Value) -> i64 {
    match v {
        Value::Int(i) => *i,
        _ => unreachable!("as_i64 called outside the Int rank"),
    }
}

fn int_arithmetic(op: &str, a: i64, b: i64) -> Result<Value, EvalError> {
    let widened = || bigint_arithmetic(op, BigInt::from(a), BigInt::from(b));
    match op {
        "+" => a.checked_add(b).map(Value::Int).map(Ok).unwrap_or_else(widened),
        "-" => a.checked_sub(b).map(Value::Int).map(Ok).unwrap_or_else(widened),
        "*" => a.checked_mul(b).map(Value::Int).map(Ok).unwrap_or_else(widened),
        "/" => {
            if b == 0 {
                return Err(EvalError::new(ErrorKind::DivisionByZero));
            }
            Ok(Value::Rational(RationalValue::new(BigInt::from(a), BigInt::from(b))))
        }
        "%" => {
            if b == 0 {
                return Err(EvalError::new(ErrorKind::DivisionByZero));
            }
            a.checked_rem(b).map(Value::Int).map(Ok).unwrap_or_else(widened)
        }
        "**" => {
            if b >= 0 && b <= u32::MAX as i64 {
                a.checked_pow(b as u32).map(Value::Int).map(Ok).unwrap_or_else(widened)
            } else {
                widened()
            }
        }
        _ => unreachable!("int_arithmetic called with a non-arithmetic operator"),
    }
}

fn bigint_arithmetic(op: &str, a: BigInt, b: BigInt) -> Result<Value, EvalError> {
    let result = match op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => {
            if b.is_zero() {
                return Err(EvalError::new(ErrorKind::DivisionByZero));
            }
            return Ok(Value::Rational(RationalValue::new(a, b)));
        }
        "%" => {
            if b.is_zero() {
                return Err(EvalError::new(ErrorKind::DivisionByZero));
            }
            a % b
        }
        "**" => {
            if b.is_negative() {
                return rational_arithmetic(op, RationalValue::from_bigint(a), RationalValue::from_bigint(b));
            }
            let exp = b.to_u64().unwrap_or(u64::MAX);
            num_traits::pow(a, exp as usize)
        }
        _ => unreachable!("bigint_arithmetic called with a non-arithmetic operator"),
    };
    Ok(Value::BigInt(Arc::new(result)))
}

fn rational_arithmetic(op: &str, a: RationalValue, b: RationalValue) -> Result<Value, EvalError> {
    let result = match op {
        "+" => a.add(&b),
        "-" => a.sub(&b),
        "*" => a.mul(&b),
        "/" => a.div(&b).ok_or_else(|| EvalError::new(ErrorKind::DivisionByZero))?,
        "%" => return float_arithmetic(op, a.to_f64(), b.to_f64()),
        "**" => return float_arithmetic(op, a.to_f64(), b.to_f64()),
        _ => unreachable!("rational_arithmetic called with a non-arithmetic operator"),
    };
    Ok(Value::Rational(result))
}

fn float_arithmetic(op: &str, a: f64, b: f64) -> Result<Value, EvalError> {
    let result = match op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => a / b,
        "%" => a % b,
        "**" => a.powf(b),
        _ => unreachable!("float_arithmetic called with a non-arithmetic operator"),
    };
    Ok(Value::Float(result))
}

fn compare(l: &Value, r: &Value, op: &str) -> Result<bool, EvalError> {
    use std::cmp::Ordering;
    let ordering = match (l, r) {
        (Value::Char(a), Value::Char(b)) => a.cmp(b),
        _ if rank_of(l).is_some() && rank_of(r).is_some() => {
            let rank = rank_of(l).unwrap().max(rank_of(r).unwrap());
            match rank {
                NumericRank::Int => as_i64(l).cmp(&as_i64(r)),
                NumericRank::BigInt => as_bigint(l).cmp(&as_bigint(r)),
                NumericRank::Rational => {
                    let (a, b) = (as_rational(l), as_rational(r));
                    (&*a.num * &*b.den).cmp(&(&*b.num * &*a.den))
                }
                NumericRank::Float => as_f64(l).partial_cmp(&as_f64(r)).unwrap_or(Ordering::Equal),
            }
        }
        _ => match (l.as_string(), r.as_string()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                return Err(EvalError::new(ErrorKind::TypeMismatch(format!(
                    "cannot compare {} and {}",
                    crate::value::type_name(l),
                    crate::value::type_name(r)
                ))))
            }
        },
    };
    Ok(match op {
        "<" => ordering == Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        ">" => ordering == Ordering::Greater,
        ">=" => ordering != Ordering::Less,
        _ => unreachable!("compare called with a non-comparison operator"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::env::Env;
    use crate::span::Span;
    use crate::value::DataInstanceValue;

    fn span() -> Span {
        Span::new(0, 0, 0, 0, 0, 0)
    }

    fn node(kind: NodeKind) -> Node {
        Node { id: 0, span: span(), kind }
    }

    fn some(v: Value) -> Value {
        Value::DataInstance(DataInstanceValue::new(Arc::from("Option"), Arc::from("Some"), vec![v]))
    }

    fn zero() -> Value {
        Value::DataInstance(DataInstanceValue::new(Arc::from("Option"), Arc::from("Zero"), Vec::new()))
    }

    fn fail(v: Value) -> Value {
        Value::DataInstance(DataInstanceValue::new(Arc::from("Result"), Arc::from("Fail"), vec![v]))
    }

    /// `Some(7) ?? 0 == 7`; `Zero ?? 0 == 0`; `Fail("x") ?? 9 == 9` — the
    /// `Optional`/`Empty` super-trait fallback reaches `Result` as well as
    /// `Option`, not just the type named in the trait's own declaration.
    #[test]
    fn null_coalesce_covers_option_and_result() {
        let env = Env::root();
        let mut ev = Evaluator::new();

        let lhs = node(NodeKind::Identifier("lhs".to_string()));
        let rhs = node(NodeKind::IntLit(0));

        env.set("lhs", some(Value::Int(7)));
        let flow = eval_infix(&mut ev, "??", &lhs, &rhs, &env, false).unwrap();
        assert_eq!(flow.into_value().unwrap(), Value::Int(7));

        env.set("lhs", zero());
        let flow = eval_infix(&mut ev, "??", &lhs, &rhs, &env, false).unwrap();
        assert_eq!(flow.into_value().unwrap(), Value::Int(0));

        env.set("lhs", fail(Value::string("x")));
        let rhs9 = node(NodeKind::IntLit(9));
        let flow = eval_infix(&mut ev, "??", &lhs, &rhs9, &env, false).unwrap();
        assert_eq!(flow.into_value().unwrap(), Value::Int(9));
    }
}
