//! `url` package: scheme/host/path/query parsing, backed by the `url`
//! crate (unconditional — the `http` client feature depends on it but the
//! parsing contract itself does not, see Cargo.toml).

use super::{def, expect_string, fail, native, ok, some, zero};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

/// Inverse of `url.encode`'s `+`-for-space, `%XX`-for-other form encoding.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(bytes[i]);
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub fn install(env: &Env) {
    def(env, "url.parse", native("url.parse", 1, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        match url::Url::parse(&s) {
            Ok(u) => {
                let query = match u.query() {
                    Some(q) => some(Value::string(q)),
                    None => zero(),
                };
                Ok(ok(Value::tuple(vec![
                    Value::string(u.scheme()),
                    Value::string(u.host_str().unwrap_or("")),
                    Value::string(u.path()),
                    query,
                ])))
            }
            Err(e) => Ok(fail(Value::string(&e.to_string()))),
        }
    })));

    def(env, "url.encode", native("url.encode", 1, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        Ok(Value::string(&url::form_urlencoded::byte_serialize(s.as_bytes()).collect::<String>()))
    })));

    def(env, "url.decode", native("url.decode", 1, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        Ok(Value::string(&percent_decode(&s)))
    })));
}
