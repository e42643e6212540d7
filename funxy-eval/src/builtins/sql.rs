//! `sql` package: contract stub. `sql` is one of the built-in library
//! surfaces the evaluator only exposes a contract to — no driver is wired
//! in here; calls report that plainly rather than silently no-op.

use super::{def, fail, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

fn not_available() -> Value {
    fail(Value::string("sql package has no driver registered in this build"))
}

pub fn install(env: &Env) {
    def(env, "sql.connect", native("sql.connect", 1, Arc::new(|_ev, _args| Ok(not_available()))));
    def(env, "sql.query", native("sql.query", 2, Arc::new(|_ev, _args| Ok(not_available()))));
    def(env, "sql.execute", native("sql.execute", 2, Arc::new(|_ev, _args| Ok(not_available()))));
    def(env, "sql.close", native("sql.close", 1, Arc::new(|_ev, _args| Ok(not_available()))));
}
