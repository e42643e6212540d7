//! `rand` package, backed directly by the `rand` crate.

use super::{def, expect_float, expect_int, expect_list, native, zero};
use crate::env::Env;
use crate::value::Value;
use rand::Rng;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "rand.int", native("rand.int", 2, Arc::new(|_ev, args| {
        let lo = expect_int(&args[0])?;
        let hi = expect_int(&args[1])?;
        if lo > hi {
            return Err(crate::error::EvalError::new(crate::error::ErrorKind::TypeMismatch(
                "rand.int lower bound exceeds upper bound".to_string(),
            )));
        }
        Ok(Value::Int(rand::thread_rng().gen_range(lo..=hi)))
    })));

    def(env, "rand.float", native("rand.float", 0, Arc::new(|_ev, _args| {
        Ok(Value::Float(rand::thread_rng().gen::<f64>()))
    })));

    def(env, "rand.bool", native("rand.bool", 0, Arc::new(|_ev, _args| {
        Ok(Value::Bool(rand::thread_rng().gen::<bool>()))
    })));

    def(env, "rand.range", native("rand.range", 2, Arc::new(|_ev, args| {
        let lo = expect_float(&args[0])?;
        let hi = expect_float(&args[1])?;
        Ok(Value::Float(rand::thread_rng().gen_range(lo..hi)))
    })));

    def(env, "rand.choice", native("rand.choice", 1, Arc::new(|_ev, args| {
        let items = expect_list(&args[0])?;
        if items.is_empty() {
            return Ok(zero());
        }
        let index = rand::thread_rng().gen_range(0..items.len());
        Ok(super::some(items[index].clone()))
    })));
}
