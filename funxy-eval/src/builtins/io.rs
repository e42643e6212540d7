//! `io` package: process output/input and file access, routed through the
//! test harness's `file` mock channel.

use super::{def, expect_string, fail, native, ok};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::test_harness::{EffectDecision, MockChannel, MockResponse};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::io::BufRead;
use std::sync::{Arc, Mutex};

static STDIN: Lazy<Mutex<std::io::BufReader<std::io::Stdin>>> =
    Lazy::new(|| Mutex::new(std::io::BufReader::new(std::io::stdin())));

fn resolve_file(ev: &mut crate::eval::Evaluator, key: &str) -> Option<Result<Value, EvalError>> {
    match ev.test_runner().lock().unwrap().resolve(MockChannel::File, key) {
        EffectDecision::RealCall => None,
        EffectDecision::Mocked(MockResponse::Value(v)) => Some(Ok(v)),
        EffectDecision::Mocked(MockResponse::Error(e)) => Some(Err(e)),
        EffectDecision::Blocked => Some(Err(EvalError::new(ErrorKind::MockBlocked(key.to_string())))),
    }
}

pub fn install(env: &Env) {
    def(env, "io.print", native("io.print", 1, Arc::new(|ev, args| {
        ev.write_output(&args[0].to_string());
        Ok(Value::Nil)
    })));

    def(env, "io.println", native("io.println", 1, Arc::new(|ev, args| {
        ev.write_output(&args[0].to_string());
        ev.write_output("\n");
        Ok(Value::Nil)
    })));

    def(env, "io.readLine", native("io.readLine", 0, Arc::new(|_ev, _args| {
        let mut line = String::new();
        let n = STDIN.lock().unwrap().read_line(&mut line).map_err(|e| EvalError::new(ErrorKind::Io(e.to_string())))?;
        if n == 0 {
            return Ok(super::zero());
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(super::some(Value::string(&line)))
    })));

    def(env, "io.readFile", native("io.readFile", 1, Arc::new(|ev, args| {
        let path = expect_string(&args[0])?;
        if let Some(result) = resolve_file(ev, &path) {
            return Ok(match result {
                Ok(v) => ok(v),
                Err(e) => fail(Value::string(&e.message())),
            });
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(ok(Value::string(&contents))),
            Err(e) => Ok(fail(Value::string(&e.to_string()))),
        }
    })));

    def(env, "io.writeFile", native("io.writeFile", 2, Arc::new(|ev, args| {
        let path = expect_string(&args[0])?;
        let contents = expect_string(&args[1])?;
        if let Some(result) = resolve_file(ev, &path) {
            return Ok(match result {
                Ok(_) => ok(Value::Nil),
                Err(e) => fail(Value::string(&e.message())),
            });
        }
        match std::fs::write(&path, contents) {
            Ok(()) => Ok(ok(Value::Nil)),
            Err(e) => Ok(fail(Value::string(&e.to_string()))),
        }
    })));

    def(env, "io.exists", native("io.exists", 1, Arc::new(|ev, args| {
        let path = expect_string(&args[0])?;
        if let Some(result) = resolve_file(ev, &path) {
            return Ok(Value::Bool(result.is_ok()));
        }
        Ok(Value::Bool(std::path::Path::new(&path).exists()))
    })));
}
