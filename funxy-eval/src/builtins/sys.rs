//! `sys` package: process environment and platform queries, routed through
//! the test harness's `env` mock channel.

use super::{def, expect_string, native, some, zero};
use crate::env::Env;
use crate::test_harness::{EffectDecision, MockChannel, MockResponse};
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "sys.env", native("sys.env", 1, Arc::new(|ev, args| {
        let name = expect_string(&args[0])?;
        let decision = ev.test_runner().lock().unwrap().resolve(MockChannel::Env, &name);
        match decision {
            EffectDecision::RealCall => Ok(match std::env::var(&name) {
                Ok(v) => some(Value::string(&v)),
                Err(_) => zero(),
            }),
            EffectDecision::Mocked(MockResponse::Value(v)) => Ok(some(v)),
            EffectDecision::Mocked(MockResponse::Error(_)) => Ok(zero()),
            EffectDecision::Blocked => Err(crate::error::EvalError::new(crate::error::ErrorKind::MockBlocked(name))),
        }
    })));

    def(env, "sys.args", native("sys.args", 0, Arc::new(|_ev, _args| {
        Ok(Value::list(std::env::args().skip(1).map(|a| Value::string(&a)).collect()))
    })));

    def(env, "sys.platform", native("sys.platform", 0, Arc::new(|_ev, _args| {
        Ok(Value::string(std::env::consts::OS))
    })));
}
