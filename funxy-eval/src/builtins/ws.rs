//! `ws` package: contract stub, same rationale as `sql.rs` — the websocket
//! surface is named among the built-in packages but no client/server
//! implementation is pulled in.

use super::{def, fail, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

fn not_available() -> Value {
    fail(Value::string("ws package has no transport registered in this build"))
}

pub fn install(env: &Env) {
    def(env, "ws.connect", native("ws.connect", 1, Arc::new(|_ev, _args| Ok(not_available()))));
    def(env, "ws.send", native("ws.send", 2, Arc::new(|_ev, _args| Ok(not_available()))));
    def(env, "ws.receive", native("ws.receive", 1, Arc::new(|_ev, _args| Ok(not_available()))));
    def(env, "ws.close", native("ws.close", 1, Arc::new(|_ev, _args| Ok(not_available()))));
}
