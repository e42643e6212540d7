//! `flag` package: minimal command-line flag lookup. CLI wiring itself is
//! out of scope; only the value-level accessor a running program can call
//! is implemented here.

use super::{def, expect_string, native, some, zero};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

/// `--name value` or `--name=value`; bare `--name` yields `Bool(true)`.
fn find_flag(name: &str) -> Option<String> {
    let needle_eq = format!("--{name}=");
    let needle = format!("--{name}");
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if let Some(rest) = arg.strip_prefix(&needle_eq) {
            return Some(rest.to_string());
        }
        if *arg == needle {
            return Some(args.get(i + 1).cloned().unwrap_or_default());
        }
    }
    None
}

pub fn install(env: &Env) {
    def(env, "flag.get", native("flag.get", 1, Arc::new(|_ev, args| {
        let name = expect_string(&args[0])?;
        Ok(match find_flag(&name) {
            Some(v) => some(Value::string(&v)),
            None => zero(),
        })
    })));

    def(env, "flag.has", native("flag.has", 1, Arc::new(|_ev, args| {
        let name = expect_string(&args[0])?;
        Ok(Value::Bool(find_flag(&name).is_some()))
    })));
}
