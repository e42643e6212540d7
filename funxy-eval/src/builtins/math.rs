//! `math` package: floating-point math over the numeric tower's `Float`
//! level.

use super::{def, expect_float, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "math.pi", Value::Float(std::f64::consts::PI));
    def(env, "math.e", Value::Float(std::f64::consts::E));

    def(env, "math.abs", native("math.abs", 1, Arc::new(|_ev, args| {
        match &args[0] {
            Value::Int(i) => Ok(Value::Int(i.abs())),
            other => Ok(Value::Float(expect_float(other)?.abs())),
        }
    })));

    def(env, "math.sqrt", native("math.sqrt", 1, Arc::new(|_ev, args| {
        Ok(Value::Float(expect_float(&args[0])?.sqrt()))
    })));

    def(env, "math.floor", native("math.floor", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_float(&args[0])?.floor() as i64))
    })));

    def(env, "math.ceil", native("math.ceil", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_float(&args[0])?.ceil() as i64))
    })));

    def(env, "math.round", native("math.round", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_float(&args[0])?.round() as i64))
    })));

    def(env, "math.pow", native("math.pow", 2, Arc::new(|_ev, args| {
        Ok(Value::Float(expect_float(&args[0])?.powf(expect_float(&args[1])?)))
    })));

    def(env, "math.min", native("math.min", 2, Arc::new(|_ev, args| {
        Ok(Value::Float(expect_float(&args[0])?.min(expect_float(&args[1])?)))
    })));

    def(env, "math.max", native("math.max", 2, Arc::new(|_ev, args| {
        Ok(Value::Float(expect_float(&args[0])?.max(expect_float(&args[1])?)))
    })));

    def(env, "math.sin", native("math.sin", 1, Arc::new(|_ev, args| Ok(Value::Float(expect_float(&args[0])?.sin())))));
    def(env, "math.cos", native("math.cos", 1, Arc::new(|_ev, args| Ok(Value::Float(expect_float(&args[0])?.cos())))));
    def(env, "math.tan", native("math.tan", 1, Arc::new(|_ev, args| Ok(Value::Float(expect_float(&args[0])?.tan())))));
    def(env, "math.log", native("math.log", 1, Arc::new(|_ev, args| Ok(Value::Float(expect_float(&args[0])?.ln())))));
    def(env, "math.exp", native("math.exp", 1, Arc::new(|_ev, args| Ok(Value::Float(expect_float(&args[0])?.exp())))));

    def(env, "math.toFloat", native("math.toFloat", 1, Arc::new(|_ev, args| {
        Ok(Value::Float(expect_float(&args[0])?))
    })));

    def(env, "math.toInt", native("math.toInt", 1, Arc::new(|_ev, args| {
        match &args[0] {
            Value::Int(i) => Ok(Value::Int(*i)),
            other => Ok(Value::Int(expect_float(other)? as i64)),
        }
    })));
}
