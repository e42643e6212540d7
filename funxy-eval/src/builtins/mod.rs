//! The built-in library surface: virtual packages the
//! evaluator registers into the global scope at startup. Each package is a
//! flat set of `package.name`-qualified bindings (e.g. `list.map`), matching
//! how [`crate::dispatch::prelude`] names its own trait instances
//! (`List.fmap`). Real logic backs the packages the core evaluator's own
//! testable properties exercise directly (list, map, string, bytes, bits,
//! math, bignum, tuple, char, task, test, json, uuid, regex); the rest are
//! thin, contract-accurate stubs.

mod bignum;
mod bits;
mod bytes;
mod charpkg;
mod cryptopkg;
mod csv;
mod date;
mod flag;
mod httppkg;
mod io;
mod json;
mod list;
mod log;
mod map;
mod math;
mod path;
mod randpkg;
mod regexpkg;
mod sql;
mod string;
mod sys;
mod task;
mod testpkg;
mod tuple;
mod url;
mod uuidpkg;
mod ws;

use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::{BuiltinValue, DataInstanceValue, NativeFn, Value};
use std::sync::Arc;

/// Installs every virtual package into `env`.
pub fn register_all(env: &Env) {
    list::install(env);
    map::install(env);
    string::install(env);
    bytes::install(env);
    bits::install(env);
    math::install(env);
    bignum::install(env);
    tuple::install(env);
    charpkg::install(env);
    task::install(env);
    testpkg::install(env);
    json::install(env);
    uuidpkg::install(env);
    regexpkg::install(env);
    flag::install(env);
    csv::install(env);
    log::install(env);
    path::install(env);
    url::install(env);
    sql::install(env);
    ws::install(env);
    date::install(env);
    randpkg::install(env);
    httppkg::install(env);
    cryptopkg::install(env);
    sys::install(env);
    io::install(env);
}

/// Builds a fixed-arity, non-variadic native builtin, mirroring
/// [`crate::dispatch::prelude`]'s private `builtin()` helper.
fn native(name: &'static str, min_arity: usize, func: NativeFn) -> Value {
    Value::Builtin(Arc::new(BuiltinValue {
        name: Arc::from(name),
        signature: None,
        min_arity,
        variadic: false,
        defaults: Arc::new(Vec::new()),
        func,
    }))
}

/// Like [`native`] but accepts any number of arguments at or above
/// `min_arity` (used by e.g. `string.concat`, `list.concat`'s variadic
/// cousins when a package wants to take a spread tail).
fn native_variadic(name: &'static str, min_arity: usize, func: NativeFn) -> Value {
    Value::Builtin(Arc::new(BuiltinValue {
        name: Arc::from(name),
        signature: None,
        min_arity,
        variadic: true,
        defaults: Arc::new(Vec::new()),
        func,
    }))
}

fn def(env: &Env, name: &'static str, value: Value) {
    env.set(name, value);
}

fn some(v: Value) -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Option"), Arc::from("Some"), vec![v]))
}

fn zero() -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Option"), Arc::from("Zero"), Vec::new()))
}

fn ok(v: Value) -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Result"), Arc::from("Ok"), vec![v]))
}

fn fail(v: Value) -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Result"), Arc::from("Fail"), vec![v]))
}

fn type_mismatch(expected: &str, got: &Value) -> EvalError {
    EvalError::new(ErrorKind::TypeMismatch(format!(
        "expected {expected}, got {}",
        crate::value::type_name(got)
    )))
}

fn expect_int(v: &Value) -> Result<i64, EvalError> {
    match v {
        Value::Int(i) => Ok(*i),
        other => Err(type_mismatch("Int", other)),
    }
}

fn expect_float(v: &Value) -> Result<f64, EvalError> {
    match v {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::BigInt(b) => Ok(b.to_string().parse().unwrap_or(f64::NAN)),
        Value::Rational(r) => Ok(r.to_f64()),
        other => Err(type_mismatch("a number", other)),
    }
}

fn expect_string(v: &Value) -> Result<String, EvalError> {
    v.as_string().ok_or_else(|| type_mismatch("String", v))
}

fn expect_char(v: &Value) -> Result<char, EvalError> {
    match v {
        Value::Char(c) => Ok(*c),
        other => Err(type_mismatch("Char", other)),
    }
}

fn expect_bool(v: &Value) -> Result<bool, EvalError> {
    match v {
        Value::Bool(b) => Ok(*b),
        other => Err(type_mismatch("Bool", other)),
    }
}

fn expect_list(v: &Value) -> Result<Vec<Value>, EvalError> {
    match v {
        Value::List(list) => Ok(list.items.iter().collect()),
        other => Err(type_mismatch("List", other)),
    }
}

fn expect_tuple(v: &Value) -> Result<Arc<Vec<Value>>, EvalError> {
    match v {
        Value::Tuple(t) => Ok(Arc::clone(t)),
        other => Err(type_mismatch("Tuple", other)),
    }
}

fn expect_bytes(v: &Value) -> Result<crate::value::BytesValue, EvalError> {
    match v {
        Value::Bytes(b) => Ok(b.clone()),
        other => Err(type_mismatch("Bytes", other)),
    }
}

fn expect_bits(v: &Value) -> Result<crate::value::BitsValue, EvalError> {
    match v {
        Value::Bits(b) => Ok(b.clone()),
        other => Err(type_mismatch("Bits", other)),
    }
}

fn expect_map(v: &Value) -> Result<Arc<crate::value::MapValue>, EvalError> {
    match v {
        Value::Map(m) => Ok(Arc::clone(m)),
        other => Err(type_mismatch("Map", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_binds_one_function_per_package() {
        let env = Env::root();
        register_all(&env);
        for name in ["list.map", "string.concat", "math.abs", "json.parse", "task.async", "uuid.v4"] {
            assert!(env.lookup(name).is_some(), "{name} was not registered");
        }
    }

    #[test]
    fn expect_int_rejects_non_int() {
        assert!(expect_int(&Value::Bool(true)).is_err());
        assert_eq!(expect_int(&Value::Int(7)).unwrap(), 7);
    }

    #[test]
    fn expect_float_widens_int_and_bigint() {
        assert_eq!(expect_float(&Value::Int(3)).unwrap(), 3.0);
        assert!(expect_float(&Value::Char('x')).is_err());
    }

    #[test]
    fn some_and_zero_build_distinct_option_constructors() {
        let s = some(Value::Int(1));
        let z = zero();
        assert_ne!(s, z);
        match s {
            Value::DataInstance(d) => assert_eq!(d.constructor.as_ref(), "Some"),
            _ => panic!("expected a DataInstance"),
        }
    }

    #[test]
    fn ok_and_fail_build_distinct_result_constructors() {
        match ok(Value::Int(1)) {
            Value::DataInstance(d) => assert_eq!(d.constructor.as_ref(), "Ok"),
            _ => panic!("expected a DataInstance"),
        }
        match fail(Value::Int(1)) {
            Value::DataInstance(d) => assert_eq!(d.constructor.as_ref(), "Fail"),
            _ => panic!("expected a DataInstance"),
        }
    }

    #[test]
    fn native_builtin_is_not_variadic_native_variadic_is() {
        let f = native("x", 1, Arc::new(|_ev, args: Vec<Value>| Ok(args[0].clone())));
        let g = native_variadic("y", 1, Arc::new(|_ev, args: Vec<Value>| Ok(args[0].clone())));
        match (f, g) {
            (Value::Builtin(f), Value::Builtin(g)) => {
                assert!(!f.variadic);
                assert!(g.variadic);
            }
            _ => panic!("expected builtins"),
        }
    }
}
