//! `bignum` package: arbitrary-precision integer arithmetic over
//! `Value::BigInt`, independent of the `+`/`-`/`*` operators' own
//! promotion, so user code can request exact big-integer math without
//! first overflowing an `Int`.

use super::{def, expect_string, fail, native, ok, type_mismatch};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::Value;
use num_bigint::BigInt;
use num_traits::Zero;
use std::str::FromStr;
use std::sync::Arc;

fn as_bigint(v: &Value) -> Result<BigInt, EvalError> {
    match v {
        Value::Int(i) => Ok(BigInt::from(*i)),
        Value::BigInt(b) => Ok((**b).clone()),
        other => Err(type_mismatch("Int or BigInt", other)),
    }
}

pub fn install(env: &Env) {
    def(env, "bignum.fromString", native("bignum.fromString", 1, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        match BigInt::from_str(s.trim()) {
            Ok(n) => Ok(ok(Value::BigInt(Arc::new(n)))),
            Err(e) => Ok(fail(Value::string(&e.to_string()))),
        }
    })));

    def(env, "bignum.toString", native("bignum.toString", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&as_bigint(&args[0])?.to_string()))
    })));

    def(env, "bignum.add", native("bignum.add", 2, Arc::new(|_ev, args| {
        Ok(Value::BigInt(Arc::new(as_bigint(&args[0])? + as_bigint(&args[1])?)))
    })));

    def(env, "bignum.sub", native("bignum.sub", 2, Arc::new(|_ev, args| {
        Ok(Value::BigInt(Arc::new(as_bigint(&args[0])? - as_bigint(&args[1])?)))
    })));

    def(env, "bignum.mul", native("bignum.mul", 2, Arc::new(|_ev, args| {
        Ok(Value::BigInt(Arc::new(as_bigint(&args[0])? * as_bigint(&args[1])?)))
    })));

    def(env, "bignum.div", native("bignum.div", 2, Arc::new(|_ev, args| {
        let b = as_bigint(&args[1])?;
        if b.is_zero() {
            return Err(EvalError::new(ErrorKind::DivisionByZero));
        }
        Ok(Value::BigInt(Arc::new(as_bigint(&args[0])? / b)))
    })));

    def(env, "bignum.mod", native("bignum.mod", 2, Arc::new(|_ev, args| {
        let b = as_bigint(&args[1])?;
        if b.is_zero() {
            return Err(EvalError::new(ErrorKind::DivisionByZero));
        }
        Ok(Value::BigInt(Arc::new(as_bigint(&args[0])? % b)))
    })));

    def(env, "bignum.pow", native("bignum.pow", 2, Arc::new(|_ev, args| {
        let base = as_bigint(&args[0])?;
        let exp = as_bigint(&args[1])?;
        let exp = exp.to_string().parse::<u32>().map_err(|_| {
            EvalError::new(ErrorKind::NumericOverflow("bignum.pow exponent out of range".to_string()))
        })?;
        Ok(Value::BigInt(Arc::new(num_traits::pow(base, exp as usize))))
    })));

    def(env, "bignum.compare", native("bignum.compare", 2, Arc::new(|_ev, args| {
        use std::cmp::Ordering;
        let ordering = as_bigint(&args[0])?.cmp(&as_bigint(&args[1])?);
        Ok(Value::Int(match ordering {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }))
    })));
}
