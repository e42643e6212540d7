//! `date` package: wall-clock queries. Calendar/format handling is left
//! to an external collaborator; only the epoch-millisecond contract the
//! evaluator itself can exercise (task timeouts, ordering) is implemented
//! directly against `std::time`.

use super::{def, native};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn now_millis() -> Result<i64, EvalError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .map_err(|e| EvalError::new(ErrorKind::Io(e.to_string())))
}

pub fn install(env: &Env) {
    def(env, "date.nowMillis", native("date.nowMillis", 0, Arc::new(|_ev, _args| {
        Ok(Value::Int(now_millis()?))
    })));

    def(env, "date.nowSeconds", native("date.nowSeconds", 0, Arc::new(|_ev, _args| {
        Ok(Value::Int(now_millis()? / 1000))
    })));
}
