//! `test` package: the process-wide test runner and
//! its per-channel mock tables.

use super::{def, expect_string, native};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::test_harness::{MockChannel, MockResponse, TestResult};
use crate::value::Value;
use std::sync::Arc;

fn channel_from(name: &str) -> Result<MockChannel, EvalError> {
    match name {
        "http" => Ok(MockChannel::Http),
        "file" => Ok(MockChannel::File),
        "env" => Ok(MockChannel::Env),
        other => Err(EvalError::new(ErrorKind::TypeMismatch(format!("unknown mock channel `{other}`")))),
    }
}

pub fn install(env: &Env) {
    def(env, "test.run", native("test.run", 2, Arc::new(|ev, args| {
        let name = expect_string(&args[0])?;
        let body = args[1].clone();
        ev.test_runner().lock().unwrap().reset_mocks();
        let outcome = crate::apply::call(ev, &body, Vec::new());
        ev.test_runner().lock().unwrap().reset_mocks();
        ev.test_runner().lock().unwrap().record(TestResult {
            name,
            passed: outcome.is_ok(),
            skipped: false,
            expect_fail: false,
            error: outcome.as_ref().err().map(EvalError::message),
        });
        Ok(Value::Nil)
    })));

    def(env, "test.expectFail", native("test.expectFail", 2, Arc::new(|ev, args| {
        let name = expect_string(&args[0])?;
        let body = args[1].clone();
        ev.test_runner().lock().unwrap().reset_mocks();
        let outcome = crate::apply::call(ev, &body, Vec::new());
        ev.test_runner().lock().unwrap().reset_mocks();
        ev.test_runner().lock().unwrap().record(TestResult {
            name,
            passed: outcome.is_err(),
            skipped: false,
            expect_fail: true,
            error: outcome.as_ref().err().map(EvalError::message),
        });
        Ok(Value::Nil)
    })));

    def(env, "test.skip", native("test.skip", 1, Arc::new(|ev, args| {
        let reason = expect_string(&args[0])?;
        ev.test_runner().lock().unwrap().record(TestResult {
            name: reason,
            passed: false,
            skipped: true,
            expect_fail: false,
            error: None,
        });
        Ok(Value::Nil)
    })));

    def(env, "test.mockHttp", native("test.mockHttp", 2, Arc::new(|ev, args| {
        let pattern = expect_string(&args[0])?;
        ev.test_runner().lock().unwrap().register(MockChannel::Http, pattern, MockResponse::Value(args[1].clone()));
        Ok(Value::Nil)
    })));

    def(env, "test.mockFile", native("test.mockFile", 2, Arc::new(|ev, args| {
        let pattern = expect_string(&args[0])?;
        ev.test_runner().lock().unwrap().register(MockChannel::File, pattern, MockResponse::Value(args[1].clone()));
        Ok(Value::Nil)
    })));

    def(env, "test.mockEnv", native("test.mockEnv", 2, Arc::new(|ev, args| {
        let pattern = expect_string(&args[0])?;
        ev.test_runner().lock().unwrap().register(MockChannel::Env, pattern, MockResponse::Value(args[1].clone()));
        Ok(Value::Nil)
    })));

    def(env, "test.bypass", native("test.bypass", 1, Arc::new(|ev, args| {
        let channel = channel_from(&expect_string(&args[0])?)?;
        ev.test_runner().lock().unwrap().set_bypass(channel, true);
        Ok(Value::Nil)
    })));

    def(env, "test.activate", native("test.activate", 1, Arc::new(|ev, args| {
        let channel = channel_from(&expect_string(&args[0])?)?;
        ev.test_runner().lock().unwrap().set_active(channel, true);
        Ok(Value::Nil)
    })));
}
