//! `http` package: a minimal client, routed through the test harness's
//! mock channel first.

use super::{def, expect_string, fail, native, ok};
use crate::env::Env;
use crate::test_harness::{EffectDecision, MockChannel, MockResponse};
use crate::value::Value;
use std::sync::Arc;

fn mock_key(method: &str, url: &str) -> String {
    format!("{method} {url}")
}

#[cfg(feature = "http")]
fn perform_real(method: &str, url: &str, body: Option<&str>) -> Result<Value, crate::error::EvalError> {
    use crate::error::{ErrorKind, EvalError};
    let request = match method {
        "GET" => ureq::get(url),
        "POST" => ureq::post(url),
        "PUT" => ureq::put(url),
        "DELETE" => ureq::delete(url),
        other => ureq::request(other, url),
    };
    let response = match body {
        Some(b) => request.send_string(b),
        None => request.call(),
    };
    match response {
        Ok(resp) => {
            let status = resp.status() as i64;
            let text = resp.into_string().unwrap_or_default();
            Ok(ok(Value::tuple(vec![Value::Int(status), Value::string(&text)])))
        }
        Err(ureq::Error::Status(status, resp)) => {
            let text = resp.into_string().unwrap_or_default();
            Ok(ok(Value::tuple(vec![Value::Int(status as i64), Value::string(&text)])))
        }
        Err(e) => Err(EvalError::new(ErrorKind::Io(e.to_string()))),
    }
}

#[cfg(not(feature = "http"))]
fn perform_real(_method: &str, _url: &str, _body: Option<&str>) -> Result<Value, crate::error::EvalError> {
    Err(crate::error::EvalError::new(crate::error::ErrorKind::Io(
        "http support not compiled in (feature `http` disabled)".to_string(),
    )))
}

fn request(
    ev: &mut crate::eval::Evaluator,
    method: &str,
    url: &str,
    body: Option<&str>,
) -> Result<Value, crate::error::EvalError> {
    let key = mock_key(method, url);
    let decision = ev.test_runner().lock().unwrap().resolve(MockChannel::Http, &key);
    match decision {
        EffectDecision::RealCall => perform_real(method, url, body),
        EffectDecision::Mocked(MockResponse::Value(v)) => Ok(ok(v)),
        EffectDecision::Mocked(MockResponse::Error(e)) => Err(e),
        EffectDecision::Blocked => Err(crate::error::EvalError::new(crate::error::ErrorKind::MockBlocked(key))),
    }
}

pub fn install(env: &Env) {
    def(env, "http.get", native("http.get", 1, Arc::new(|ev, args| {
        let url = expect_string(&args[0])?;
        match request(ev, "GET", &url, None) {
            Ok(v) => Ok(v),
            Err(e) => Ok(fail(Value::string(&e.message()))),
        }
    })));

    def(env, "http.post", native("http.post", 2, Arc::new(|ev, args| {
        let url = expect_string(&args[0])?;
        let body = expect_string(&args[1])?;
        match request(ev, "POST", &url, Some(&body)) {
            Ok(v) => Ok(v),
            Err(e) => Ok(fail(Value::string(&e.message()))),
        }
    })));

    def(env, "http.put", native("http.put", 2, Arc::new(|ev, args| {
        let url = expect_string(&args[0])?;
        let body = expect_string(&args[1])?;
        match request(ev, "PUT", &url, Some(&body)) {
            Ok(v) => Ok(v),
            Err(e) => Ok(fail(Value::string(&e.message()))),
        }
    })));

    def(env, "http.delete", native("http.delete", 1, Arc::new(|ev, args| {
        let url = expect_string(&args[0])?;
        match request(ev, "DELETE", &url, None) {
            Ok(v) => Ok(v),
            Err(e) => Ok(fail(Value::string(&e.message()))),
        }
    })));
}
