//! `tuple` package: fixed-arity heterogeneous products.

use super::{def, expect_int, expect_tuple, native};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "tuple.size", native("tuple.size", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_tuple(&args[0])?.len() as i64))
    })));

    def(env, "tuple.get", native("tuple.get", 2, Arc::new(|_ev, args| {
        let t = expect_tuple(&args[0])?;
        let index = expect_int(&args[1])?;
        if index < 0 || index as usize >= t.len() {
            return Err(EvalError::new(ErrorKind::OutOfBounds { index, length: t.len() }));
        }
        Ok(t[index as usize].clone())
    })));

    def(env, "tuple.toList", native("tuple.toList", 1, Arc::new(|_ev, args| {
        Ok(Value::list((*expect_tuple(&args[0])?).clone()))
    })));
}
