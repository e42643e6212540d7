//! `uuid` package: 128-bit identifiers. Backed directly by the `uuid`
//! crate, already a hard dependency (the core `Value` display format
//! uses it — see `value/display.rs`).

use super::{def, expect_string, fail, native, ok};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;
use uuid::Uuid;

fn expect_uuid(v: &Value) -> Result<Uuid, crate::error::EvalError> {
    match v {
        Value::Uuid(bits) => Ok(Uuid::from_u128(*bits)),
        other => Err(super::type_mismatch("UUID", other)),
    }
}

pub fn install(env: &Env) {
    def(env, "uuid.v4", native("uuid.v4", 0, Arc::new(|_ev, _args| {
        Ok(Value::Uuid(Uuid::new_v4().as_u128()))
    })));

    def(env, "uuid.nil", native("uuid.nil", 0, Arc::new(|_ev, _args| {
        Ok(Value::Uuid(Uuid::nil().as_u128()))
    })));

    def(env, "uuid.toString", native("uuid.toString", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_uuid(&args[0])?.to_string()))
    })));

    def(env, "uuid.fromString", native("uuid.fromString", 1, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        match Uuid::parse_str(s.trim()) {
            Ok(u) => Ok(ok(Value::Uuid(u.as_u128()))),
            Err(e) => Ok(fail(Value::string(&e.to_string()))),
        }
    })));

    def(env, "uuid.isNil", native("uuid.isNil", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_uuid(&args[0])?.is_nil()))
    })));
}
